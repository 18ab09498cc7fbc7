mod cluster;
mod curve;
mod efficiency;
mod plant;
mod run;

use clap::{Parser, Subcommand};

pub use self::{curve::CurveArgs, efficiency::EfficiencyCurvesArgs, run::RunArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: calculate the power output of a wind farm or a wind turbine cluster.
    #[clap(name = "run")]
    Run(Box<RunArgs>),

    /// Print the aggregated power curve without running the model.
    #[clap(name = "curve")]
    Curve(Box<CurveArgs>),

    /// List the wind efficiency curves which can reduce the hub-height wind speed.
    #[clap(name = "efficiency-curves")]
    EfficiencyCurves(EfficiencyCurvesArgs),
}
