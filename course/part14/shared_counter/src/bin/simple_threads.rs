use shared_counter::{
    announce::{announce_all, StdoutAnnouncer},
    tracing_setup::init_tracing,
    DEFAULT_THREADS,
};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    announce_all(DEFAULT_THREADS, &StdoutAnnouncer)?;

    Ok(())
}
