mod cli;
mod io;

use eyre::Report;

fn main() -> Result<(), Report> {
  color_eyre::install()?;
  cli::run()
}
