use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use tree_fs::{FsBackend, Permissions, TreeFS};

fn main() -> anyhow::Result<()> {
    // RUST_LOG=tree_fs=debug shows every mutation
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_filter(env_filter);
    tracing_subscriber::registry().with(stdout_layer).init();

    let mut fs = TreeFS::new();

    fs.mkdir("/home")?;
    fs.mkdir("/home/user")?;
    fs.mkdir("/tmp")?;

    // write creates missing files, append keeps what is there
    fs.write("/home/user/notes.txt", "Hello")?;
    fs.append("/home/user/notes.txt", ", World")?;
    fs.append("/tmp/log.txt", "started\n")?;
    fs.chmod("/home/user/notes.txt", Permissions::new(6, 0, 0))?;

    // copy is independent of its source
    fs.cp("/home/user", "/tmp/backup")?;
    fs.write("/home/user/notes.txt", "rewritten")?;
    assert_eq!(fs.cat("/tmp/backup/notes.txt")?, "Hello, World");

    // move relinks, the file keeps its metadata
    fs.mv("/tmp/log.txt", "/home/user/")?;
    let meta = fs.stat("/home/user/log.txt")?;
    tracing::info!(name = %meta.name, bytes = meta.len, mode = %meta.permissions, "moved");

    println!("{fs}");
    println!("ls /home/user: {:?}", fs.ls("/home/user")?);

    if let Err(e) = fs.rm("/home", false) {
        println!("rm /home: {e}");
    }
    fs.rm("/home", true)?;
    if let Err(e) = fs.rm("/", true) {
        println!("rm /: {e}");
    }

    print!("{}", fs.tree("/")?);
    Ok(())
}
