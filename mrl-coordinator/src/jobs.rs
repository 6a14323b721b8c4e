use glob::glob;

use crate::error::CoordinatorError;

/// The one job a coordinator runs.
///
/// Fixed for the lifetime of the coordinator: map task `i` reads `files[i]`,
/// and every key is partitioned into one of `n_reduce` buckets.
#[derive(Debug, Clone)]
pub struct Job {
    /// Input references, one per map task.
    files: Vec<String>,

    /// Number of reduce buckets.
    n_reduce: u32,
}

impl Job {
    pub fn new(files: Vec<String>, n_reduce: u32) -> Result<Self, CoordinatorError> {
        if n_reduce == 0 {
            return Err(CoordinatorError::InvalidJob(
                "the reduce count must be at least 1".into(),
            ));
        }
        if u32::try_from(files.len()).is_err() {
            return Err(CoordinatorError::InvalidJob(format!(
                "{} inputs is more than a job can index",
                files.len()
            )));
        }

        Ok(Self { files, n_reduce })
    }

    /// Build a job from input patterns.
    ///
    /// Patterns are expanded in the order given, each one's matches in the
    /// order the glob yields them. A pattern that matches nothing is kept
    /// as a literal path, so a missing input surfaces as a read failure on
    /// the worker instead of silently shrinking the job.
    pub fn from_patterns(patterns: &[String], n_reduce: u32) -> Result<Self, CoordinatorError> {
        let mut files = Vec::new();

        for pattern in patterns {
            let paths = glob(pattern)
                .map_err(|e| CoordinatorError::InvalidJob(format!("bad pattern `{pattern}`: {e}")))?;

            let mut matched = false;
            for path in paths {
                let path = path
                    .map_err(|e| CoordinatorError::InvalidJob(format!("reading `{pattern}`: {e}")))?;
                files.push(path.to_string_lossy().into_owned());
                matched = true;
            }

            if !matched {
                files.push(pattern.clone());
            }
        }

        Self::new(files, n_reduce)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Input reference of map task `index`.
    pub fn input(&self, index: u32) -> Option<&str> {
        self.files.get(index as usize).map(String::as_str)
    }

    /// Number of map tasks.
    pub fn n_map(&self) -> u32 {
        self.files.len() as u32
    }

    /// Number of reduce tasks.
    pub fn n_reduce(&self) -> u32 {
        self.n_reduce
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn rejects_zero_reducers() {
        assert!(matches!(
            Job::new(vec!["a.txt".into()], 0),
            Err(CoordinatorError::InvalidJob(_))
        ));
    }

    #[test]
    fn empty_job_is_allowed() {
        let job = Job::new(vec![], 3).unwrap();
        assert_eq!(job.n_map(), 0);
        assert_eq!(job.n_reduce(), 3);
    }

    #[test]
    fn expands_patterns_in_order() {
        let dir = TempDir::new().unwrap();
        for name in ["b.txt", "a.txt", "c.log"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let root = dir.path().display();

        let job = Job::from_patterns(
            &[format!("{root}/*.log"), format!("{root}/*.txt")],
            2,
        )
        .unwrap();

        assert_eq!(
            job.files(),
            [
                format!("{root}/c.log"),
                format!("{root}/a.txt"),
                format!("{root}/b.txt"),
            ]
        );
        assert_eq!(job.input(1), Some(format!("{root}/a.txt").as_str()));
        assert_eq!(job.input(3), None);
    }

    #[test]
    fn unmatched_pattern_is_kept_verbatim() {
        let job = Job::from_patterns(&["does/not/exist.txt".to_string()], 1).unwrap();
        assert_eq!(job.files(), ["does/not/exist.txt"]);
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        assert!(Job::from_patterns(&["[".to_string()], 1).is_err());
    }
}
