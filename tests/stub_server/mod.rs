//! An HTTP server which pretends to be the DermaDetect backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

use axum::Router;
use axum::extract::{Json, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

pub const STORED_IMAGE_PATH: &str = "/storage/12345678/2024-05-02/lesion.png";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum Recorded {
    Predict {
        fields: HashMap<String, String>,
        file: Option<UploadedFile>,
    },
    GeneratePdf(Value),
}

#[derive(Default)]
struct StubState {
    reject_predict: bool,
    recorded: Mutex<Vec<Recorded>>,
}

pub struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn start() -> Self {
        Self::start_with(StubState::default()).await
    }

    /// A server whose `/predict` answers 422.
    pub async fn rejecting_predict() -> Self {
        Self::start_with(StubState {
            reject_predict: true,
            ..Default::default()
        })
        .await
    }

    async fn start_with(state: StubState) -> Self {
        init_logging();
        let state = Arc::new(state);
        let app = Router::new()
            .route("/predict", post(predict))
            .route("/generate-pdf", post(generate_pdf))
            .route("/get_predictions", get(get_predictions))
            .route("/pdfs", get(list_pdfs))
            .route("/pdfs/:patient_id/:timestamp/:filename", get(get_pdf))
            .route("/imagenes/", get(list_images))
            .route("/imagenes/:name", get(get_image))
            .route("/descripcion/", get(description))
            .with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        Self {
            base_url: format!("http://{address}"),
            state,
        }
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }
}

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing::subscriber::set_global_default(
            tracing_subscriber::FmtSubscriber::builder()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish(),
        )
        .unwrap()
    });
}

async fn predict(State(state): State<Arc<StubState>>, mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().map(String::from);
            let content_type = field.content_type().map(String::from);
            let bytes = field.bytes().await.unwrap().to_vec();
            file = Some(UploadedFile {
                filename,
                content_type,
                bytes,
            });
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }
    let identification = fields.get("identification").cloned().unwrap_or_default();
    state
        .recorded
        .lock()
        .unwrap()
        .push(Recorded::Predict { fields, file });

    if state.reject_predict {
        return (StatusCode::UNPROCESSABLE_ENTITY, "imagen invalida").into_response();
    }
    Json(json!({
        "paciente": {
            "nombre": "Ana Lima",
            "numero_identificacion": identification,
            "edad": 45,
            "sexo": "femenino",
            "fecha_registro": "2024-05-02T09:30:00"
        },
        "diagnostico": {
            "localizacion": "Espalda",
            "observacion": "lesion pigmentada",
            "tipo_cancer": "nv",
            "fecha_diagnostico": "2024-05-02T09:30:00"
        },
        "imagen": {"ruta_imagen": STORED_IMAGE_PATH, "formato": "png"},
        "predicted_class": "nv",
        "probabilities": {"nv": 0.873, "mel": 0.1, "bkl": 0.027},
        "storage_info": {"patient_dir": "/storage/12345678", "diagnosis_date": "2024-05-02"}
    }))
    .into_response()
}

async fn generate_pdf(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state
        .recorded
        .lock()
        .unwrap()
        .push(Recorded::GeneratePdf(body));
    pdf_response(b"%PDF-1.4 diagnostic report".to_vec())
}

async fn get_predictions() -> Json<Value> {
    Json(json!([
        {
            "paciente": {"nombre": "Ana Lima", "numero_identificacion": 12345678},
            "diagnostico": {"fecha_diagnostico": "2024-05-02T09:30:00"},
            "predicted_class": "nv",
            "probabilities": {"nv": 0.873}
        },
        {
            "paciente": {"nombre": "Luis Mora", "numero_identificacion": "87654321"},
            "diagnostico": {},
            "predicted_class": "mel",
            "probabilities": {"mel": 0.6}
        }
    ]))
}

async fn list_pdfs() -> Json<Value> {
    Json(json!([
        {"patient_id": 12345678, "filename": "a.pdf", "timestamp": "2024-01-10T08:00:00"},
        {"patient_id": 12345678, "filename": "b.pdf", "timestamp": "2024-05-02T09:30:00"},
        {"patient_id": 87654321, "filename": "c.pdf", "timestamp": "2025-01-01T00:00:00"}
    ]))
}

async fn get_pdf(
    Path((patient_id, timestamp, filename)): Path<(String, String, String)>,
) -> Response {
    pdf_response(format!("%PDF {patient_id}/{timestamp}/{filename}").into_bytes())
}

async fn list_images() -> Json<Value> {
    Json(json!({"imagenes": ["melanoma.jpg", "nevus.png"]}))
}

async fn get_image(Path(name): Path<String>) -> Vec<u8> {
    name.into_bytes()
}

async fn description() -> Json<Value> {
    Json(json!({"descripcion": "Imagenes de referencia"}))
}

fn pdf_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response()
}
