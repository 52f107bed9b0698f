//! Fixtures shared by the workspace's tests.

const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn make_from(alphabet: &[u8], len: usize, seed: usize) -> String {
    let mut output = String::with_capacity(len);
    let mut idx = seed % alphabet.len();

    for _ in 0..len {
        output.push(alphabet[idx] as char);
        idx = (idx + 7) % alphabet.len();
    }

    output
}

/// A deterministic run of `len` ASCII alphanumeric characters.
#[must_use]
pub fn alnum_run(len: usize, seed: usize) -> String {
    make_from(ALNUM, len, seed)
}

/// A space-separated command line mixing short words with alphanumeric runs
/// long enough to trigger placeholder substitution.
///
/// Returns the command line and the words it is made of.
#[must_use]
pub fn long_args_commandline(long_runs: usize, run_len: usize) -> (String, Vec<String>) {
    let mut words = Vec::with_capacity(long_runs * 2 + 1);
    words.push("--input".to_string());
    for seed in 0..long_runs {
        words.push(alnum_run(run_len, seed));
        words.push(format!("--flag{seed}"));
    }
    (words.join(" "), words)
}

/// Arguments that make `sh` run `script`.
#[must_use]
pub fn sh_script(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}
