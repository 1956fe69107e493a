use tracing_error::SpanTrace;

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
	#[error("no authenticated session found")]
	MissingSession,

	#[error("authentication failed: {0}")]
	Authentication(String),

	#[error("empty response from the patreon api")]
	EmptyResponse,

	#[error("invalid response from the patreon api: {0}")]
	InvalidResponse(String),

	#[error("no campaigns found for this patreon account")]
	NoCampaign,

	#[error("no campaign found")]
	CampaignNotFound,

	#[error("a page id is required for syncing campaign data")]
	MissingPageId,

	#[error("patreon api error: {0}")]
	Api(String),

	#[error("network error: {0}")]
	Network(String),

	#[error("failed to fetch campaign stats: {0}")]
	StatsFetch(String),

	#[error("HTTP Error: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Url Parse Error: {0}")]
	UrlParseError(#[from] url::ParseError),

	#[error("JSON Error: {0}")]
	JsonError(#[from] serde_json::Error),

	#[error("SQLx Error: {0}")]
	SqlxError(#[from] sqlx::Error)
}

impl ErrorKind {
	// only network-level fetch failures are retried; api-level
	// rejections propagate immediately
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Network(_))
	}
}

#[derive(Debug)]
pub struct Error {
	pub kind: ErrorKind,
	pub context: SpanTrace
}

impl std::fmt::Display for Error {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(fmt, "{}", self.kind)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.kind.source()
	}
}

impl<E: Into<ErrorKind>> From<E> for Error {
	fn from(source: E) -> Self {
		Self {
			kind: Into::<ErrorKind>::into(source),
			context: SpanTrace::capture()
		}
	}
}

pub type Result<T> = core::result::Result<T, Error>;
