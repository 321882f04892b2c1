use anyhow::{bail, Context, Result};
use std::env;
use std::process::Command;

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub no_default_features: bool,
    /// Kernel the host is expected to pick up, for display and for the
    /// kernel-pinned test run.
    pub kernel: String,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }

    fn apply(&self, cmd: &mut Command) {
        if self.no_default_features {
            cmd.arg("--no-default-features");
        }
        if let Some(f) = self.features_arg() {
            cmd.arg("--features").arg(f);
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let arch = detect_arch();
    let extra = env::var("ROTORFFT_FEATURES").unwrap_or_default();
    compute_config(&arch, &extra)
}

fn detect_arch() -> String {
    if let Ok(arch) = env::var("ARCH") {
        if !arch.trim().is_empty() {
            return arch;
        }
    }
    Command::new("uname")
        .arg("-m")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default()
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(arch: &str, extra: &str) -> BuildConfig {
    let mut features = Vec::new();
    let mut no_default_features = false;

    let kernel = if arch.contains("x86_64") {
        "sse2"
    } else if arch.contains("aarch64") || arch.contains("arm64") {
        "neon"
    } else {
        // No vectorized butterflies for this target.
        no_default_features = true;
        features.push("std".to_string());
        "scalar"
    };

    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }

    BuildConfig {
        features,
        no_default_features,
        kernel: kernel.to_string(),
    }
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");
    cfg.apply(&mut cmd);
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("test");
    cfg.apply(&mut cmd);
    cmd
}

/// Test runs beyond the default one: the `no_std` build, the in-crate
/// property tests, the logging path, and the scalar kernel pinned through
/// `ROTORFFT_KERNEL`.
pub fn test_matrix_commands(cfg: &BuildConfig) -> Vec<Command> {
    let mut cmds = vec![test_command(cfg)];

    let mut no_std = Command::new("cargo");
    no_std.args(["build", "--lib", "--no-default-features"]);
    no_std.env("RUSTFLAGS", "-D warnings");
    cmds.push(no_std);

    let mut internal = Command::new("cargo");
    internal.args(["test", "--lib", "--features", "internal-tests"]);
    cmds.push(internal);

    let mut logging = Command::new("cargo");
    logging.args(["test", "--features", "verbose-logging"]);
    cmds.push(logging);

    if cfg.kernel != "scalar" {
        let mut scalar = test_command(cfg);
        scalar.env("ROTORFFT_KERNEL", "scalar");
        cmds.push(scalar);
    }
    cmds
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "--manifest-path", "rotorfft-bench/Cargo.toml"]);
    cmd
}

/// Run each command in order, stopping at the first failure.
pub fn run_all(cmds: Vec<Command>) -> Result<()> {
    for mut cmd in cmds {
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn {:?}", cmd))?;
        if !status.success() {
            bail!("{:?} exited with {}", cmd, status);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_compute_x86() {
        let cfg = compute_config("x86_64", "");
        assert_eq!(cfg.kernel, "sse2");
        assert!(!cfg.no_default_features);
        assert!(cfg.features.is_empty());
    }

    #[test]
    fn test_compute_aarch64() {
        let cfg = compute_config("arm64", "verbose-logging internal-tests");
        assert_eq!(cfg.kernel, "neon");
        assert!(cfg.features.contains(&"verbose-logging".into()));
        assert!(cfg.features.contains(&"internal-tests".into()));
    }

    #[test]
    fn test_compute_other_arch_drops_simd() {
        let cfg = compute_config("riscv64", "std");
        assert_eq!(cfg.kernel, "scalar");
        assert!(cfg.no_default_features);
        assert_eq!(cfg.features, vec!["std".to_string()]);
    }

    #[test]
    fn test_commands_include_features() {
        let cfg = compute_config("riscv64", "verbose-logging");
        let a = args(&build_command(&cfg));
        assert_eq!(a[0], "build");
        assert!(a.contains(&"--no-default-features".to_string()));
        assert!(a.contains(&"--features".to_string()));
        assert!(a.iter().any(|x| x.contains("verbose-logging")));
    }

    #[test]
    fn test_matrix_pins_scalar_kernel() {
        let cfg = compute_config("x86_64", "");
        let cmds = test_matrix_commands(&cfg);
        assert_eq!(cmds.len(), 5);
        let pinned = cmds.last().unwrap();
        assert!(pinned
            .get_envs()
            .any(|(k, v)| k == "ROTORFFT_KERNEL" && v.map(|v| v == "scalar").unwrap_or(false)));

        let no_std = &cmds[1];
        assert!(args(no_std).contains(&"--no-default-features".to_string()));
        assert!(no_std
            .get_envs()
            .any(|(k, v)| k == "RUSTFLAGS" && v.map(|v| v == "-D warnings").unwrap_or(false)));

        let scalar_host = compute_config("riscv64", "");
        assert_eq!(test_matrix_commands(&scalar_host).len(), 4);
    }

    #[test]
    fn test_other_commands() {
        let cfg = compute_config("x86_64", "");
        assert!(args(&test_command(&cfg)).contains(&"test".to_string()));
        assert!(args(&clippy_command()).contains(&"clippy".to_string()));
        assert!(args(&fmt_command()).contains(&"fmt".to_string()));
        let b = args(&bench_command());
        assert!(b.contains(&"bench".to_string()));
        assert!(b.contains(&"rotorfft-bench/Cargo.toml".to_string()));
    }

    #[test]
    fn test_run_all_reports_failure() {
        let cmds = vec![Command::new("true"), Command::new("false")];
        assert!(run_all(cmds).is_err());
        assert!(run_all(vec![Command::new("true")]).is_ok());
    }

    #[test]
    fn test_detect_arch_override() {
        env::set_var("ARCH", "arm64");
        assert_eq!(super::detect_arch(), "arm64");
        env::remove_var("ARCH");
    }
}
