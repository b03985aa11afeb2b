//! Script listing command.

use anyhow::Result;
use syllabus_setup::builtin_runner;

use crate::output;

pub fn execute() -> Result<()> {
    let runner = builtin_runner()?;
    output::print_scripts_table(runner.scripts());
    Ok(())
}
