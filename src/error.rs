use super::*;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
  #[error("No image provided")]
  MissingImage,
  #[error("{0:#}")]
  Internal(#[from] anyhow::Error),
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorBody {
  pub(crate) error: String,
}

impl Error {
  pub(crate) fn status(&self) -> StatusCode {
    match self {
      Self::MissingImage => StatusCode::BAD_REQUEST,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    match &self {
      Self::MissingImage => tracing::warn!(error = %self, "rejected request"),
      Self::Internal(_) => tracing::error!(error = %self, "error processing request"),
    }

    (
      status,
      Json(ErrorBody {
        error: self.to_string(),
      }),
    )
      .into_response()
  }
}
