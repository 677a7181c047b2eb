use std::io::{self, Write};

use anyhow::Result;
use tabwriter::TabWriter;
use xplan_core::CalculationBasis;

use xplan_cli::common::BasisArg;

pub fn handle(basis: BasisArg) -> Result<()> {
    let basis = CalculationBasis::from(basis);
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "KEY\tNAME\tUNIT\tBASELINE")?;
    for descriptor in basis.metrics() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            descriptor.key,
            descriptor.name,
            descriptor.unit,
            if descriptor.has_baseline { "yes" } else { "no" }
        )?;
    }
    writer.flush()?;
    Ok(())
}
