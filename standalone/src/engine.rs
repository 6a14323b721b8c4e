use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::info;

use common::task::{MapTask, ReduceTask};
use common::Workload;
use mrl_coordinator::Job;
use mrl_worker::{perform_map, perform_reduce, WorkerError};

/// Run every map task, then every reduce task, in index order.
///
/// Files land in `dir` exactly as a distributed run would leave them.
/// Returns the output paths, one per reduce bucket.
pub fn run_job(
    job: &Job,
    workload: &Workload,
    aux: &Bytes,
    dir: &Path,
) -> Result<Vec<PathBuf>, WorkerError> {
    for (index, input) in job.files().iter().enumerate() {
        let task = MapTask {
            index: index as u32,
            input: input.clone(),
            n_reduce: job.n_reduce(),
        };
        perform_map(&task, workload, aux, dir)?;
    }
    info!("Mapped {} inputs", job.n_map());

    let outputs = (0..job.n_reduce())
        .map(|index| {
            let task = ReduceTask {
                index,
                n_map: job.n_map(),
            };
            perform_reduce(&task, workload, aux, dir)
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!("Reduced {} buckets", outputs.len());

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn indexes_words_across_documents() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "red fish blue fish").unwrap();
        fs::write(&b, "one fish").unwrap();

        let files = vec![a.display().to_string(), b.display().to_string()];
        let job = Job::new(files.clone(), 1).unwrap();
        let indexer = workload::named("indexer").unwrap();

        let outputs = run_job(&job, &indexer, &Bytes::new(), dir.path()).unwrap();
        assert_eq!(outputs, [dir.path().join("mr-out-0")]);

        let output = fs::read_to_string(&outputs[0]).unwrap();
        let fish = output
            .lines()
            .find_map(|line| line.strip_prefix("fish "))
            .unwrap();
        assert_eq!(fish, format!("2 {},{}", files[0], files[1]));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn every_bucket_gets_an_output() {
        let dir = TempDir::new().unwrap();
        let job = Job::new(vec![], 4).unwrap();
        let wc = workload::named("wc").unwrap();

        let outputs = run_job(&job, &wc, &Bytes::new(), dir.path()).unwrap();
        assert_eq!(outputs.len(), 4);
        assert!(outputs.iter().all(|p| fs::metadata(p).unwrap().len() == 0));
    }
}
