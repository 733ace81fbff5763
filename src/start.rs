use crate::Args;
use crate::args::Command;
use crate::errors::Result;
use crate::interfaces::ObjectBackend;
use crate::storage::{ObjectBody, ObjectMatch, ObjectStore, ReadMode};
use anyhow::Context;
use std::io::Write;

/// Connect with the configuration from `args` and run its command, returning the exit code
pub fn run_app(args: &Args) -> anyhow::Result<i32> {
    let config = args.storage_config();
    let store = ObjectStore::shared(&config)
        .with_context(|| format!("Failed to connect to {}", config.endpoint_url))?;

    let stdout = std::io::stdout();
    let code = run_command(&store, &args.command, &mut stdout.lock())?;
    Ok(code)
}

/// Run one command against `store`, writing results to `out`
pub fn run_command<B: ObjectBackend, W: Write>(
    store: &ObjectStore<B>,
    command: &Command,
    out: &mut W,
) -> Result<i32> {
    match command {
        Command::Exists { bucket, prefix } => {
            let exists = store.key_exists(bucket, prefix)?;
            writeln!(out, "{exists}")?;
            Ok(if exists { 0 } else { 1 })
        }
        Command::Ls { bucket, prefix } => {
            for object in store.get_bucket(bucket).objects(prefix)? {
                writeln!(
                    out,
                    "{:>12}  {}",
                    object.size.map(|s| s.to_string()).unwrap_or_default(),
                    object.key
                )?;
            }
            Ok(0)
        }
        Command::Cat { bucket, key, raw } => {
            let object = match store.get_object(key, bucket)? {
                // an exact key wins over other keys sharing the prefix
                ObjectMatch::Many(objects) => objects
                    .into_iter()
                    .find(|o| o.key == *key)
                    .map(ObjectMatch::One)
                    .unwrap_or(ObjectMatch::None),
                other => other,
            }
            .into_single(bucket, key)?;

            let mode = if *raw { ReadMode::Raw } else { ReadMode::Text };
            match store.read_object(&object, mode)? {
                ObjectBody::Text(text) => write!(out, "{text}")?,
                body => out.write_all(&body.into_bytes())?,
            }
            Ok(0)
        }
        Command::Mkdir { bucket, name } => {
            store.create_folder(name, bucket)?;
            Ok(0)
        }
        Command::Put {
            bucket,
            from,
            to,
            keep,
        } => {
            store.upload_file(from, to, bucket, !keep)?;
            writeln!(out, "uploaded {} to s3://{bucket}/{to}", from.display())?;
            Ok(0)
        }
        Command::Csv { bucket, key, rows } => {
            let table = store.read_csv(key, bucket)?;
            writeln!(out, "{}", table.columns().join(","))?;
            for row in table.rows().iter().take(*rows) {
                let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                writeln!(out, "{}", cells.join(","))?;
            }
            writeln!(
                out,
                "[{} rows x {} columns]",
                table.num_rows(),
                table.columns().len()
            )?;
            Ok(0)
        }
    }
}
