//! Startup loading with a bounded interactive retry.
//!
//! If the dataset can't be loaded, the user is asked for a corrected path
//! up to [`MAX_PATH_PROMPTS`] times before the process gives up.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dialoguer::Input;
use disaster_dash_dataset_models::Dataset;

use crate::progress::ProgressCallback;
use crate::{DatasetError, load_from_path};

/// How many times the user is asked for a corrected path after the
/// initial attempt fails.
pub const MAX_PATH_PROMPTS: u32 = 3;

/// Source of replacement paths after a failed load.
pub trait PathPrompt {
    /// Asks for a new path after `failed` could not be loaded.
    ///
    /// Returning `None` aborts the retry loop immediately.
    fn ask(&mut self, failed: &Path, error: &DatasetError) -> Option<PathBuf>;
}

/// Prompts on the terminal via `dialoguer`.
///
/// If the terminal isn't interactive the prompt fails and loading is
/// aborted.
pub struct TerminalPrompt;

impl PathPrompt for TerminalPrompt {
    fn ask(&mut self, failed: &Path, error: &DatasetError) -> Option<PathBuf> {
        eprintln!("Could not load {}: {error}", failed.display());

        match Input::<String>::new()
            .with_prompt("Path to the cleaned dataset")
            .default(failed.display().to_string())
            .interact_text()
        {
            Ok(path) => Some(PathBuf::from(path.trim())),
            Err(e) => {
                log::error!("Unable to prompt for a dataset path: {e}");
                None
            }
        }
    }
}

/// Never supplies a new path; the first failure is final.
pub struct NoPrompt;

impl PathPrompt for NoPrompt {
    fn ask(&mut self, _failed: &Path, _error: &DatasetError) -> Option<PathBuf> {
        None
    }
}

/// Loads the dataset, asking `prompt` for a new path after each failure.
///
/// Makes at most `1 + MAX_PATH_PROMPTS` load attempts.
///
/// # Errors
///
/// Returns [`DatasetError::AttemptsExhausted`] when every attempt failed or
/// the prompt declined to supply another path.
pub fn load_with_retry(
    initial: &Path,
    prompt: &mut dyn PathPrompt,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    let mut path = initial.to_path_buf();
    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match load_from_path(&path, progress) {
            Ok(dataset) => return Ok(dataset),
            Err(e) => e,
        };

        log::warn!("Failed to load dataset (attempt {attempts}): {error}");

        if attempts > MAX_PATH_PROMPTS {
            break;
        }

        match prompt.ask(&path, &error) {
            Some(next) => path = next,
            None => break,
        }
    }

    log::error!("Giving up on loading the dataset after {attempts} attempts");

    Err(DatasetError::AttemptsExhausted { attempts, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    /// Replays a fixed list of answers and records how often it was asked.
    struct ScriptedPrompt {
        answers: Vec<PathBuf>,
        asked: u32,
    }

    impl PathPrompt for ScriptedPrompt {
        fn ask(&mut self, _failed: &Path, _error: &DatasetError) -> Option<PathBuf> {
            self.asked += 1;
            if self.answers.is_empty() {
                None
            } else {
                Some(self.answers.remove(0))
            }
        }
    }

    fn missing(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("disaster_dash_missing_{name}.csv"))
    }

    #[test]
    fn gives_up_after_three_prompts() {
        let mut prompt = ScriptedPrompt {
            answers: vec![missing("a"), missing("b"), missing("c"), missing("d")],
            asked: 0,
        };

        let err = load_with_retry(&missing("start"), &mut prompt, &null_progress()).unwrap_err();

        assert_eq!(prompt.asked, MAX_PATH_PROMPTS);
        match err {
            DatasetError::AttemptsExhausted { attempts, path } => {
                assert_eq!(attempts, MAX_PATH_PROMPTS + 1);
                assert_eq!(path, missing("c"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn declined_prompt_aborts_immediately() {
        let err = load_with_retry(&missing("start"), &mut NoPrompt, &null_progress()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::AttemptsExhausted { attempts: 1, .. }
        ));
    }

    #[test]
    fn recovers_with_corrected_path() {
        let dir = std::env::temp_dir().join("disaster_dash_retry_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("events.csv");
        std::fs::write(
            &good,
            "id,type,iso,country,subregion,region,year,month,total_deaths,total_affected,total_damage,last_update\n\
             a,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2010,4,100,,,\n",
        )
        .unwrap();

        let mut prompt = ScriptedPrompt {
            answers: vec![missing("typo"), good],
            asked: 0,
        };

        let dataset = load_with_retry(&missing("start"), &mut prompt, &null_progress()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(prompt.asked, 2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
