use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into a run.
const SCRUBBED_ENV: &[&str] = &[
    "RESUME_ATS_CONFIG",
    "RESUME_ATS_EMBEDDING_BACKEND",
    "RESUME_ATS_EMBEDDING_TIMEOUT_MS",
    "RESUME_ATS_CACHE_DISABLED",
    "RESUME_ATS_CACHE_MAX_ENTRIES",
    "RESUME_ATS_KEYWORD_WEIGHT",
    "RESUME_ATS_SEMANTIC_WEIGHT",
    "RESUME_ATS_THRESHOLD",
    "RESUME_ATS_TAXONOMY",
    "RUST_LOG",
];

/// Assert command succeeded
#[macro_export]
macro_rules! assert_command_success {
    ($output:expr) => {
        assert!(
            $output.success,
            "Command failed with exit code {}\nstdout: {}\nstderr: {}",
            $output.exit_code, $output.stdout, $output.stderr
        );
    };
}

/// Isolated working directory and config home for one `ats` run.
pub struct TestFixture {
    pub temp_dir: TempDir,
    /// Working directory of every run
    pub root: PathBuf,
    /// `XDG_CONFIG_HOME`, so the user's global config is never read
    pub config_home: PathBuf,
}

impl TestFixture {
    pub fn new(test_name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("project");
        let config_home = temp_dir.path().join("config");
        std::fs::create_dir_all(&root).expect("Failed to create project dir");
        std::fs::create_dir_all(&config_home).expect("Failed to create config dir");

        println!("[FIXTURE] Test: {test_name}");
        println!("[FIXTURE] Root: {}", root.display());

        Self {
            temp_dir,
            root,
            config_home,
        }
    }

    /// Write `content` under the project root and return its path.
    pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write the user-level config file.
    pub fn write_global_config(&self, content: &str) -> PathBuf {
        let path = self.config_home.join("resume-ats/config.toml");
        std::fs::create_dir_all(path.parent().expect("config path has parent"))
            .expect("Failed to create global config dir");
        std::fs::write(&path, content).expect("Failed to write global config");
        path
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ats"));
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", self.temp_dir.path())
            .current_dir(&self.root);
        cmd
    }

    pub fn run_ats(&self, args: &[&str]) -> CommandOutput {
        self.run_ats_with_env(args, &[])
    }

    pub fn run_ats_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> CommandOutput {
        println!("[CMD] ats {}", args.join(" "));
        let start = Instant::now();

        let mut cmd = self.command();
        cmd.args(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("Failed to execute ats command");

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            elapsed: start.elapsed(),
        };
        println!("[CMD] Exit code: {} in {:?}", result.exit_code, result.elapsed);
        if !result.stderr.is_empty() {
            println!("[STDERR]\n{}", result.stderr);
        }
        result
    }
}

#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Parse stdout as JSON, panicking with the raw output on failure.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|err| {
            panic!("stdout is not JSON ({err}):\n{}", self.stdout);
        })
    }
}
