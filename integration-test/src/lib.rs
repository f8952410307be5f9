//! Test driver for gnuopt integration tests.
//!
//! Spawns the `gnuopt` binary with:
//! - stdin: a pipe, so an option map can be fed with `--stdin`
//! - stdout: a pipe, captured and decoded as JSON
//! - stderr: a pipe, captured for assertions

use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

/// A running gnuopt process.
pub struct TestSession {
    child: Child,
    /// Write end of the child's stdin, closed by `close_stdin` or on exit.
    stdin: Option<ChildStdin>,
    /// Captured stdout, populated by background thread.
    stdout_capture: Arc<Mutex<Vec<u8>>>,
    /// Captured stderr, populated by background thread.
    stderr_capture: Arc<Mutex<Vec<u8>>>,
    /// Join handle for stdout drain thread.
    _stdout_thread: thread::JoinHandle<()>,
    /// Join handle for stderr drain thread.
    _stderr_thread: thread::JoinHandle<()>,
}

/// Copy everything from `pipe` into `capture` until EOF.
fn drain<R: Read + Send + 'static>(
    mut pipe: R,
    capture: Arc<Mutex<Vec<u8>>>,
    label: &'static str,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    capture
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .extend_from_slice(&buf[..n]);
                }
                Err(e) => {
                    eprintln!("{label} drain error: {e}");
                    break;
                }
            }
        }
    })
}

impl TestSession {
    /// Spawn gnuopt with the given arguments.
    ///
    /// `binary` is the path to the gnuopt binary.
    /// `args` are the command-line arguments.
    /// `env` are additional environment variables to set.
    pub fn spawn(binary: &str, args: &[&str], env: &[(&str, &str)]) -> std::io::Result<TestSession> {
        let mut cmd = Command::new(binary);
        cmd.args(args);
        // Keep the child's log filter independent of the test runner's.
        cmd.env_remove("GNUOPT_LOG");
        for (k, v) in env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        let stdin = child.stdin.take();

        let stdout_capture = Arc::new(Mutex::new(Vec::new()));
        let stderr_capture = Arc::new(Mutex::new(Vec::new()));
        let stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout not piped"))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr not piped"))?;
        let stdout_thread = drain(stdout_pipe, Arc::clone(&stdout_capture), "stdout");
        let stderr_thread = drain(stderr_pipe, Arc::clone(&stderr_capture), "stderr");

        Ok(TestSession {
            child,
            stdin,
            stdout_capture,
            stderr_capture,
            _stdout_thread: stdout_thread,
            _stderr_thread: stderr_thread,
        })
    }

    /// Write `data` to the child's stdin.
    pub fn send(&mut self, data: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(data.as_bytes())
            .expect("failed to write to child stdin");
        stdin.flush().expect("failed to flush child stdin");
    }

    /// Close stdin so the child sees EOF.
    pub fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Wait for the child to exit and assert the exit code.
    pub fn wait_exit(mut self, expected_code: i32) -> SessionOutput {
        self.close_stdin();
        let status = self.child.wait().expect("failed to wait for child");
        let code = status.code().unwrap_or(-1);

        // Wait for capture threads to finish.
        // (They'll finish once the child's fds close.)
        let _ = self._stdout_thread.join();
        let _ = self._stderr_thread.join();

        let stdout = String::from_utf8_lossy(
            &self.stdout_capture.lock().unwrap_or_else(|e| e.into_inner()),
        )
        .to_string();
        let stderr = String::from_utf8_lossy(
            &self.stderr_capture.lock().unwrap_or_else(|e| e.into_inner()),
        )
        .to_string();

        assert_eq!(
            code, expected_code,
            "expected exit code {expected_code}, got {code}\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );

        SessionOutput { stdout, stderr }
    }
}

/// Output captured from a completed session.
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl SessionOutput {
    /// Decode stdout as a single JSON document.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({e}):\n{}", self.stdout)
        })
    }
}
