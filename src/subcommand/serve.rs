use {
  super::*,
  tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
  },
};

const DEFAULT_PORT: u16 = 8000;

const MOCK_PORT: u16 = 6000;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub(crate) enum LogFormat {
  Text,
  Json,
}

#[derive(Debug, Parser)]
pub(crate) struct Serve {
  #[clap(long, env = "MNIST_HOST", default_value = "0.0.0.0")]
  host: String,
  #[clap(
    short,
    long,
    env = "MNIST_PORT",
    help = "Port to listen on [default: 8000, or 6000 with --mock]"
  )]
  port: Option<u16>,
  #[clap(short, long, env = "MNIST_WEIGHTS", default_value = "mnist_model.json")]
  weights: PathBuf,
  #[clap(
    long,
    env = "MNIST_MOCK",
    help = "Answer every upload with a fixed prediction instead of loading a model"
  )]
  mock: bool,
  #[clap(long, env = "MNIST_MAX_UPLOAD_BYTES", default_value = "16777216")]
  max_upload_bytes: usize,
  #[clap(long, env = "MNIST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
  log_format: LogFormat,
}

impl Serve {
  pub(crate) fn run(self) -> Result {
    Self::init_tracing(self.log_format);

    let predictor = self.predictor()?;

    let addr = format!("{}:{}", self.host, self.port());

    let router = server::router(predictor, self.max_upload_bytes);

    tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .context("failed to start async runtime")?
      .block_on(async {
        let listener = tokio::net::TcpListener::bind(&addr)
          .await
          .with_context(|| format!("failed to bind to {addr}"))?;

        tracing::info!(%addr, "listening for HTTP traffic");

        axum::serve(listener, router).await?;

        Ok::<(), anyhow::Error>(())
      })
  }

  fn port(&self) -> u16 {
    self
      .port
      .unwrap_or(if self.mock { MOCK_PORT } else { DEFAULT_PORT })
  }

  fn predictor(&self) -> Result<Arc<dyn Predictor>> {
    if self.mock {
      tracing::info!("serving mock predictions");
      return Ok(Arc::new(Mock));
    }

    tracing::info!(weights = %self.weights.display(), "loading model");

    let network = Network::load_weights(&self.weights).with_context(|| {
      format!("failed to load model from {}", self.weights.display())
    })?;

    tracing::info!("model loaded");

    Ok(Arc::new(network))
  }

  fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new("mnist_server=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
      LogFormat::Json => registry
        .with(tracing_subscriber::fmt::layer().json())
        .init(),
      LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
  }
}
