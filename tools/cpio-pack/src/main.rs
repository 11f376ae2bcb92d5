use bootloader::Checksum;
use cpio_newc::ArchiveBuilder;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, fs, io};

const USAGE: &str = "usage: cpio-pack <input_dir> <out_archive>
       cpio-pack --checksum <image>";

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [flag, image] if flag == "--checksum" => checksum(Path::new(image)),
        [dir, out] => pack(Path::new(dir), Path::new(out)),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Print what `load` should report for `image`, and the size to type at its prompt.
fn checksum(image: &Path) -> io::Result<()> {
    let bytes = fs::read(image)?;
    println!("size:     {}", bytes.len());
    println!("checksum: {}", Checksum::of(&bytes));
    Ok(())
}

fn pack(dir: &Path, out: &Path) -> io::Result<()> {
    // Regular files only, sorted by name.
    let mut items = Vec::new();
    for ent in fs::read_dir(dir)? {
        let ent = ent?;
        let md = ent.metadata()?;
        if !md.is_file() {
            continue;
        }
        let name = ent.file_name().into_string().map_err(|name| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file name {name:?} is not UTF-8"),
            )
        })?;
        let mtime = md.modified().map_or(0, unix_seconds);
        items.push((name, mtime, fs::read(ent.path())?));
    }
    items.sort_by(|a, b| a.0.cmp(&b.0));

    let count = items.len();
    let archive = items
        .iter()
        .fold(ArchiveBuilder::new(), |builder, (name, mtime, data)| {
            builder.mtime(*mtime).file(name, data)
        })
        .finish();

    fs::write(out, &archive)?;
    eprintln!("packed {count} files ({} bytes) into {}", archive.len(), out.display());
    Ok(())
}

/// Seconds since the epoch as stored in a header; 0 if out of range.
fn unix_seconds(time: SystemTime) -> u32 {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u32::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}
