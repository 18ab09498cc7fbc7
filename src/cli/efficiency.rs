use clap::Parser;

use crate::{
    core::wake_losses::WindEfficiencyCurve,
    prelude::*,
    tables::build_efficiency_curves_table,
};

const ILLUSTRATIVE_NOTE: &str = "Note: the built-in curves are illustrative approximations \
    shaped after the dena and Knorr curves, not the published tables.";

#[derive(Parser)]
pub struct EfficiencyCurvesArgs {
    /// Print only the curve names.
    #[clap(long = "names-only")]
    names_only: bool,
}

impl EfficiencyCurvesArgs {
    pub fn run(&self) -> Result {
        if self.names_only {
            for name in WindEfficiencyCurve::names()? {
                println!("{name}");
            }
        } else {
            println!("{}", build_efficiency_curves_table(&WindEfficiencyCurve::all()?));
            println!("{ILLUSTRATIVE_NOTE}");
        }
        Ok(())
    }
}
