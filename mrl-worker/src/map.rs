use std::fs;
use std::path::Path;

use bytes::Bytes;
use itertools::Itertools;
use tracing::{debug, info};

use common::partition::{bucket, intermediate_name, write_atomic};
use common::task::MapTask;
use common::{codec, KeyValue, Workload};

use crate::error::WorkerError;

/// Run the map function over one input and write its partitioned output.
///
/// Pairs are stable-sorted by `(bucket, key)` so each bucket is one
/// contiguous run, and every run is written atomically to the file named by
/// `(task.index, bucket)` inside `dir`. Buckets without pairs get no file.
/// Returns the number of intermediate files written.
pub fn perform_map(
    task: &MapTask,
    workload: &Workload,
    aux: &Bytes,
    dir: &Path,
) -> Result<usize, WorkerError> {
    if task.n_reduce == 0 {
        return Err(WorkerError::Protocol(format!(
            "map task {} has no reduce buckets",
            task.index
        )));
    }

    let input = Path::new(&task.input);
    let contents = fs::read(input).map_err(WorkerError::io("reading input", input))?;
    info!(
        "Mapping `{}` ({} bytes) as task {}",
        task.input,
        contents.len(),
        task.index
    );

    let kv = KeyValue::new(task.input.clone(), contents);
    let mut pairs = (workload.map_fn)(kv, aux.clone())
        .map_err(WorkerError::Workload)?
        .map(|item| item.map(|kv| (bucket(&kv.key, task.n_reduce), kv)))
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(WorkerError::Workload)?;

    pairs.sort_by(|(a, x), (b, y)| a.cmp(b).then_with(|| x.key.cmp(&y.key)));

    let mut written = 0;
    for (bucket, run) in &pairs.iter().chunk_by(|(bucket, _)| *bucket) {
        let name = intermediate_name(task.index, bucket);
        let contents = codec::encode_all(run.map(|(_, kv)| kv));

        write_atomic(dir, &name, &contents)
            .map_err(WorkerError::io("writing intermediate file", &dir.join(&name)))?;
        written += 1;
    }
    debug!(
        "Map task {} emitted {} pairs into {} buckets",
        task.index,
        pairs.len(),
        written
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn wc() -> Workload {
        workload::named("wc").unwrap()
    }

    fn read_intermediate(path: &Path) -> Vec<KeyValue> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| codec::decode(line).unwrap())
            .collect()
    }

    #[test]
    fn partitions_every_pair_into_its_bucket() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "the cat saw the other cat and a dog").unwrap();

        let task = MapTask {
            index: 4,
            input: input.display().to_string(),
            n_reduce: 3,
        };
        perform_map(&task, &wc(), &Bytes::new(), dir.path()).unwrap();

        let mut total = 0;
        for b in 0..3 {
            let path = dir.path().join(intermediate_name(4, b));
            if !path.exists() {
                continue;
            }
            let pairs = read_intermediate(&path);
            assert!(!pairs.is_empty());
            for kv in &pairs {
                assert_eq!(bucket(&kv.key, 3), b);
            }
            let keys: Vec<_> = pairs.iter().map(|kv| kv.key.clone()).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
            total += pairs.len();
        }
        assert_eq!(total, 9);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "").unwrap();

        let task = MapTask {
            index: 0,
            input: input.display().to_string(),
            n_reduce: 2,
        };
        assert_eq!(perform_map(&task, &wc(), &Bytes::new(), dir.path()).unwrap(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn rerun_produces_identical_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "b a c a b a").unwrap();
        let task = MapTask {
            index: 0,
            input: input.display().to_string(),
            n_reduce: 2,
        };

        perform_map(&task, &wc(), &Bytes::new(), dir.path()).unwrap();
        let first: Vec<_> = (0..2)
            .map(|b| fs::read(dir.path().join(intermediate_name(0, b))).ok())
            .collect();

        perform_map(&task, &wc(), &Bytes::new(), dir.path()).unwrap();
        let second: Vec<_> = (0..2)
            .map(|b| fs::read(dir.path().join(intermediate_name(0, b))).ok())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let task = MapTask {
            index: 0,
            input: dir.path().join("nope.txt").display().to_string(),
            n_reduce: 1,
        };

        let err = perform_map(&task, &wc(), &Bytes::new(), dir.path()).unwrap_err();
        assert!(matches!(err, WorkerError::Io { .. }));
    }

    #[test]
    fn map_function_errors_are_surfaced() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("graph.txt");
        fs::write(&input, "1 2\nnot-an-edge\n").unwrap();
        let task = MapTask {
            index: 0,
            input: input.display().to_string(),
            n_reduce: 1,
        };

        let degree = workload::named("vertex-degree").unwrap();
        let err = perform_map(&task, &degree, &Bytes::new(), dir.path()).unwrap_err();
        assert!(matches!(err, WorkerError::Workload(_)));
    }
}
