use {
  self::server_error::ServerError,
  super::*,
  axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
  },
  camino::Utf8Component,
  mime_guess::mime,
  tokio::runtime,
};

mod server_error;

#[derive(Debug, Parser)]
pub struct Server {
  #[arg(
    long,
    default_value = "0.0.0.0:8000",
    help = "Listen on <ADDRESS> for incoming requests."
  )]
  address: SocketAddr,
  #[arg(
    long,
    default_value = "assets",
    help = "Serve files in <ASSETS> under `/assets/`."
  )]
  assets: Utf8PathBuf,
}

#[derive(Debug)]
struct Resource {
  content_type: Mime,
  content: Vec<u8>,
}

impl Resource {
  fn new(content_type: Mime, content: Vec<u8>) -> Self {
    Self {
      content_type,
      content,
    }
  }
}

impl IntoResponse for Resource {
  fn into_response(self) -> Response {
    (
      [(header::CONTENT_TYPE, self.content_type.to_string())],
      self.content,
    )
      .into_response()
  }
}

#[derive(Debug, PartialEq, Serialize)]
struct Status {
  name: &'static str,
  version: &'static str,
  status: &'static str,
}

type ServerResult<T = Resource> = std::result::Result<T, ServerError>;

impl Server {
  pub fn run(self) -> Result {
    let threads = Threads::detect();

    log::info!(
      "starting runtime with {} worker threads on {} cores",
      threads.workers,
      threads.cores,
    );

    if !self.assets.is_dir() {
      log::warn!("assets directory `{}` does not exist", self.assets);
    }

    let assets = Arc::new(self.assets);

    runtime::Builder::new_multi_thread()
      .worker_threads(threads.workers)
      .enable_all()
      .build()
      .context(error::Runtime)?
      .block_on(async {
        log::info!("listening on {}", self.address);

        axum_server::Server::bind(self.address)
          .serve(Self::router(assets).into_make_service())
          .await
          .context(error::Serve {
            address: self.address,
          })
      })?;

    Ok(())
  }

  fn router(assets: Arc<Utf8PathBuf>) -> Router {
    Router::new()
      .route("/", get(Self::status))
      .route("/assets/*path", get(Self::asset))
      .layer(Extension(assets))
  }

  async fn status() -> Json<Status> {
    Json(Status {
      name: env!("CARGO_PKG_NAME"),
      version: env!("CARGO_PKG_VERSION"),
      status: "ok",
    })
  }

  async fn asset(assets: Extension<Arc<Utf8PathBuf>>, Path(path): Path<String>) -> ServerResult {
    Self::file(&assets, &path).await
  }

  async fn file(root: &Utf8Path, path: &str) -> ServerResult {
    let relative = Utf8Path::new(path);

    if path.is_empty()
      || !relative
        .components()
        .all(|component| matches!(component, Utf8Component::Normal(_)))
    {
      return Err(ServerError::NotFound { path: path.into() });
    }

    let full = root.join(relative);

    match tokio::fs::read(&full).await {
      Ok(content) => Ok(Resource::new(
        mime_guess::from_path(&full).first_or_octet_stream(),
        content,
      )),
      Err(err) => {
        if err.kind() != io::ErrorKind::NotFound {
          log::warn!("failed to read asset `{full}`: {err}");
        }
        Err(ServerError::NotFound { path: path.into() })
      }
    }
  }
}
