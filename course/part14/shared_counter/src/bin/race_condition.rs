use shared_counter::{
    tracing_setup::init_tracing,
    Regime,
    DEFAULT_ITERATIONS_PER_THREAD,
    DEFAULT_THREADS,
};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let outcome = shared_counter::run(
        DEFAULT_THREADS,
        DEFAULT_ITERATIONS_PER_THREAD,
        Regime::Unsynchronized,
    )?;
    println!("{outcome}");

    Ok(())
}
