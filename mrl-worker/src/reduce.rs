use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use itertools::Itertools;
use tracing::{debug, info};

use common::partition::{intermediate_name, output_name, write_atomic};
use common::task::ReduceTask;
use common::{codec, KeyValue, Workload};

use crate::error::WorkerError;

/// Collect every pair of bucket `task.index` from the intermediate files in
/// `dir`. A map task that emitted nothing for this bucket left no file,
/// which is skipped.
fn gather(task: &ReduceTask, dir: &Path) -> Result<Vec<KeyValue>, WorkerError> {
    let mut pairs = Vec::new();

    for map_index in 0..task.n_map {
        let path = dir.join(intermediate_name(map_index, task.index));
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(WorkerError::io("reading intermediate file", &path)(e)),
        };

        for (n, line) in contents.lines().enumerate() {
            let kv = codec::decode(line).map_err(|e| WorkerError::Corrupt {
                path: path.clone(),
                line: n + 1,
                reason: e.to_string(),
            })?;
            pairs.push(kv);
        }
    }

    Ok(pairs)
}

/// Reduce bucket `task.index` into its final output file in `dir`.
///
/// The output holds one `key result` line per distinct key, in ascending
/// byte order of the keys, and is written even if the bucket is empty.
pub fn perform_reduce(
    task: &ReduceTask,
    workload: &Workload,
    aux: &Bytes,
    dir: &Path,
) -> Result<PathBuf, WorkerError> {
    let mut pairs = gather(task, dir)?;
    info!(
        "Reducing bucket {} ({} pairs from up to {} files)",
        task.index,
        pairs.len(),
        task.n_map
    );

    // Stable, so values of one key keep the order they were read in.
    pairs.sort_by_key(KeyValue::key);

    let mut out = Vec::new();
    let mut keys = 0;
    for (key, group) in &pairs.into_iter().chunk_by(KeyValue::key) {
        let values = group.map(KeyValue::into_value);
        let result = (workload.reduce_fn)(key.clone(), Box::new(values), aux.clone())
            .map_err(WorkerError::Workload)?;

        out.extend_from_slice(&key);
        out.push(b' ');
        out.extend_from_slice(&result);
        out.push(b'\n');
        keys += 1;
    }

    let name = output_name(task.index);
    let path = write_atomic(dir, &name, &out)
        .map_err(WorkerError::io("writing output file", &dir.join(&name)))?;
    debug!("Reduce task {} wrote {} keys", task.index, keys);

    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn wc() -> Workload {
        workload::named("wc").unwrap()
    }

    fn write_intermediate(dir: &Path, map_index: u32, bucket: u32, pairs: &[(&str, &str)]) {
        let pairs: Vec<_> = pairs
            .iter()
            .map(|(k, v)| KeyValue::new(k.to_string(), v.to_string()))
            .collect();
        fs::write(
            dir.join(intermediate_name(map_index, bucket)),
            codec::encode_all(&pairs),
        )
        .unwrap();
    }

    #[test]
    fn merges_all_map_outputs_in_key_order() {
        let dir = TempDir::new().unwrap();
        write_intermediate(dir.path(), 0, 1, &[("b", "1"), ("a", "1")]);
        write_intermediate(dir.path(), 2, 1, &[("a", "1"), ("c", "1"), ("a", "1")]);
        // Other buckets are none of our business.
        write_intermediate(dir.path(), 0, 0, &[("zzz", "1")]);

        let task = ReduceTask { index: 1, n_map: 3 };
        let path = perform_reduce(&task, &wc(), &Bytes::new(), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("mr-out-1"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a 3\nb 1\nc 1\n");
    }

    #[test]
    fn empty_bucket_still_writes_output() {
        let dir = TempDir::new().unwrap();
        let task = ReduceTask { index: 0, n_map: 4 };

        let path = perform_reduce(&task, &wc(), &Bytes::new(), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn corrupt_line_is_reported_with_its_position() {
        let dir = TempDir::new().unwrap();
        let mut contents = codec::encode_all(&[KeyValue::new("a", "1")]);
        contents.extend_from_slice(b"not base64 at all\n");
        fs::write(dir.path().join(intermediate_name(0, 0)), contents).unwrap();

        let task = ReduceTask { index: 0, n_map: 1 };
        let err = perform_reduce(&task, &wc(), &Bytes::new(), dir.path()).unwrap_err();
        match err {
            WorkerError::Corrupt { path, line, .. } => {
                assert_eq!(path, dir.path().join("mr-0-0"));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join(output_name(0)).exists());
    }

    #[test]
    fn values_reach_reduce_in_read_order() {
        let dir = TempDir::new().unwrap();
        write_intermediate(dir.path(), 0, 0, &[("doc", "x")]);
        write_intermediate(dir.path(), 1, 0, &[("doc", "y")]);

        fn concat(
            _key: Bytes,
            values: Box<dyn Iterator<Item = Bytes> + '_>,
            _aux: Bytes,
        ) -> anyhow::Result<Bytes> {
            Ok(values.flat_map(|v| v.to_vec()).collect::<Vec<u8>>().into())
        }
        let workload = Workload {
            reduce_fn: concat,
            ..wc()
        };

        let task = ReduceTask { index: 0, n_map: 2 };
        let path = perform_reduce(&task, &workload, &Bytes::new(), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "doc xy\n");
    }
}
