#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, StringFormat,
    dictionary,
};
use pdf_ai_pipeline::config::AppConfig;
use pdf_ai_pipeline::models::StoredObject;
use pdf_ai_pipeline::services::ai_processor::AiProcessor;
use pdf_ai_pipeline::services::document_pipeline::DocumentPipeline;
use pdf_ai_pipeline::services::llm::{ChatMessage, LlmClient, LlmError};
use pdf_ai_pipeline::services::storage::{ObjectStore, StorageError, generate_object_name};
use pdf_ai_pipeline::{AppState, create_app};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_MODEL: &str = "gemini-test";
pub const BUCKET: &str = "pdfs";

pub struct MockObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    reachable: bool,
    store_calls: AtomicUsize,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            reachable: true,
            store_calls: AtomicUsize::new(0),
        }
    }

    /// Every operation fails as if the endpoint refused the connection.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn insert(&self, name: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert(name.to_string(), data.into());
    }

    fn refused() -> StorageError {
        StorageError::Unavailable("connection refused".to_string())
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        if self.reachable {
            Ok(())
        } else {
            Err(Self::refused())
        }
    }

    async fn store(
        &self,
        data: Bytes,
        filename: &str,
        _content_type: Option<&str>,
    ) -> Result<StoredObject, StorageError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if !self.reachable {
            return Err(Self::refused());
        }

        let object_name = generate_object_name(filename);
        let size_bytes = data.len();
        self.objects
            .lock()
            .unwrap()
            .insert(object_name.clone(), data);

        Ok(StoredObject {
            locator: format!("{}/{}", BUCKET, object_name),
            object_name,
            size_bytes,
        })
    }

    async fn fetch(&self, object_name: &str) -> Result<Bytes, StorageError> {
        if !self.reachable {
            return Err(Self::refused());
        }
        self.objects
            .lock()
            .unwrap()
            .get(object_name)
            .cloned()
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "PDF object '{}' not found in bucket '{}'.",
                    object_name, BUCKET
                ))
            })
    }

    async fn health_check(&self) -> bool {
        self.reachable
    }
}

/// Replies with the same canned text to every request and records what it was sent.
pub struct MockLlmClient {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl MockLlmClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        self.reply.clone().map_err(LlmError::Request)
    }
}

pub fn pipeline(
    storage: Arc<MockObjectStore>,
    llm: Option<Arc<MockLlmClient>>,
) -> DocumentPipeline {
    let config = AppConfig::development();
    let ai = llm.map(|client| Arc::new(AiProcessor::new(client, TEST_MODEL.to_string())));
    DocumentPipeline::new(storage, ai, config.upload, TEST_MODEL.to_string())
}

pub fn app(storage: Arc<MockObjectStore>, llm: Option<Arc<MockLlmClient>>) -> Router {
    let pipeline = Arc::new(pipeline(storage.clone(), llm));
    create_app(AppState {
        storage,
        pipeline,
        config: AppConfig::development(),
    })
}

/// Builds a PDF with one page per entry. `None` yields a page with no text operators.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    save_pdf(pdf_document(pages))
}

/// Same layout as `build_pdf`, encrypted (RC4, 128-bit) under `user_password`.
pub fn build_encrypted_pdf(pages: &[Option<&str>], user_password: &str) -> Vec<u8> {
    let mut doc = pdf_document(pages);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![1u8; 16], StringFormat::Literal),
            Object::String(vec![2u8; 16], StringFormat::Literal),
        ]),
    );

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner-secret",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).expect("encryption state");
    doc.encrypt(&state).expect("encrypt pdf");

    save_pdf(doc)
}

/// Points the `Contents` of the 1-based `page_number` at an object that does not exist.
pub fn build_pdf_with_broken_page(pages: &[Option<&str>], page_number: u32) -> Vec<u8> {
    let mut doc = pdf_document(pages);
    let page_id = doc.get_pages()[&page_number];
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .expect("page dictionary")
        .set("Contents", Object::Reference((9999, 0)));
    save_pdf(doc)
}

fn save_pdf(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

pub fn pdf_document(pages: &[Option<&str>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

const BOUNDARY: &str = "----pdf-ai-pipeline-test-boundary";

/// Hand-assembled `multipart/form-data` body. `file` is `(filename, bytes)`.
pub fn multipart_body(
    file: Option<(&str, &[u8])>,
    system_prompt: Option<&str>,
    description: Option<&str>,
) -> MultipartBody {
    let mut body = Vec::new();

    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in [("system_prompt", system_prompt), ("description", description)] {
        if let Some(value) = value {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    }
}
