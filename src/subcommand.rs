use {super::*, predict::Predict, serve::Serve};

mod predict;
mod serve;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[clap(name = "predict", about = "Classify a single image file")]
  Predict(Predict),
  #[clap(name = "serve", about = "Serve predictions over HTTP")]
  Serve(Serve),
}

impl Subcommand {
  pub(crate) fn run(self) -> Result {
    match self {
      Self::Predict(predict) => predict.run(),
      Self::Serve(serve) => serve.run(),
    }
  }
}
