use {
  super::*,
  tower_http::{
    cors::Any,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse},
  },
  tracing::Level,
};

pub(crate) const LIVENESS: &str = "Server is running!";

#[derive(Clone)]
struct AppState {
  predictor: Arc<dyn Predictor>,
}

pub(crate) fn router(
  predictor: Arc<dyn Predictor>,
  max_upload_bytes: usize,
) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  let trace = TraceLayer::new_for_http()
    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
    .on_request(DefaultOnRequest::new().level(Level::INFO))
    .on_response(DefaultOnResponse::new().level(Level::INFO));

  Router::new()
    .route("/", get(home))
    .route("/predict", post(predict))
    .with_state(AppState { predictor })
    .layer(DefaultBodyLimit::max(max_upload_bytes))
    .layer(cors)
    .layer(trace)
}

async fn home() -> &'static str {
  LIVENESS
}

async fn predict(
  State(state): State<AppState>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, Error> {
  let mut multipart = multipart.map_err(|rejection| {
    tracing::debug!(%rejection, "request body is not multipart");
    Error::MissingImage
  })?;

  let image = read_image(&mut multipart).await?.ok_or(Error::MissingImage)?;

  tracing::debug!(bytes = image.len(), "received image");

  let predictor = state.predictor.clone();

  let prediction =
    tokio::task::spawn_blocking(move || predictor.predict(&image))
      .await
      .context("prediction task failed")??;

  tracing::info!(
    digit = prediction.digit,
    confidence = prediction.confidence,
    "prediction"
  );

  Ok(Json(prediction))
}

async fn read_image(multipart: &mut Multipart) -> Result<Option<Vec<u8>>> {
  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => return Ok(None),
      Err(error) if error.status() == StatusCode::PAYLOAD_TOO_LARGE => {
        return Err(error).context("failed to read multipart body");
      }
      Err(error) => {
        tracing::debug!(%error, "malformed multipart body");
        return Ok(None);
      }
    };

    if field.name() == Some("image") && field.file_name().is_some() {
      let bytes = field.bytes().await.context("failed to read image upload")?;
      return Ok(Some(bytes.to_vec()));
    }
  }
}
