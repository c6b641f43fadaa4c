use {
  crate::{
    arguments::Arguments, config::*, error::Error, math::*, network::Network,
    predictor::{Mock, Prediction, Predictor},
    subcommand::Subcommand,
  },
  anyhow::{bail, ensure, Context},
  axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
  },
  clap::{Parser, ValueEnum},
  image::{imageops::FilterType, GrayImage, Luma},
  ndarray::{Array1, Array2, Array4, ArrayView1, ArrayView2, ArrayView4, Axis},
  serde::{Deserialize, Serialize},
  std::{
    fs::{read, File},
    path::PathBuf,
    process,
    sync::Arc,
  },
  tower_http::{cors::CorsLayer, trace::TraceLayer},
};

mod arguments;
mod config;
mod error;
mod math;
mod network;
mod predictor;
mod preprocess;
mod server;
mod subcommand;

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn main() {
  if let Err(error) = Arguments::parse().run() {
    eprintln!("error: {error:#}");
    process::exit(1);
  }
}
