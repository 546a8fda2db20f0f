use super::{ClientError, Session};
use crate::notes::{
    CreateNoteRequest, DeletedNote, Note, NoteId, NotePatch, Priority, UpdateNoteRequest,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Typed client for the note API.
///
/// Every successful call is reflected in the local mirror returned by
/// [`notes`](Self::notes). A 401 from the server clears the session and the
/// mirror.
pub struct NoteClient {
    base_url: String,
    http: reqwest::Client,
    session: Session,
    notes: Vec<Note>,
}

impl NoteClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session,
            notes: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Local copy of the user's notes, as of the last successful call
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Drop the credential and everything mirrored under it
    pub fn sign_out(&mut self) {
        self.session.clear();
        self.notes.clear();
    }

    /// Replace the mirror with the server's list
    pub async fn fetch_notes(&mut self) -> Result<&[Note], ClientError> {
        let req = self.http.get(format!("{}/api/notes", self.base_url));
        let notes: Vec<Note> = self.send(req).await?;
        self.notes = notes;
        Ok(&self.notes)
    }

    pub async fn add_note(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> Result<Note, ClientError> {
        let body = CreateNoteRequest {
            title: title.to_string(),
            description: description.to_string(),
            priority: priority.as_str().to_string(),
        };
        let req = self
            .http
            .post(format!("{}/api/notes", self.base_url))
            .json(&body);

        let note: Note = self.send(req).await?;
        self.notes.push(note.clone());
        Ok(note)
    }

    pub async fn edit_note(&mut self, id: NoteId, patch: &NotePatch) -> Result<Note, ClientError> {
        let body = UpdateNoteRequest {
            title: patch.title.clone(),
            description: patch.description.clone(),
            priority: patch.priority.map(|p| p.as_str().to_string()),
        };
        let req = self
            .http
            .put(format!("{}/api/notes/{}", self.base_url, id))
            .json(&body);

        let note: Note = self.send(req).await?;
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(local) => *local = note.clone(),
            None => self.notes.push(note.clone()),
        }
        Ok(note)
    }

    /// Delete a note, returning its last state
    pub async fn delete_note(&mut self, id: NoteId) -> Result<Note, ClientError> {
        let req = self
            .http
            .delete(format!("{}/api/notes/{}", self.base_url, id));

        let deleted: DeletedNote = self.send(req).await?;
        self.notes.retain(|n| n.id != id);
        Ok(deleted.note)
    }

    async fn send<T: DeserializeOwned>(&mut self, req: RequestBuilder) -> Result<T, ClientError> {
        let token = self.session.token().ok_or(ClientError::NoSession)?;
        let resp = req.bearer_auth(token).send().await?;
        self.read(resp).await
    }

    async fn read<T: DeserializeOwned>(&mut self, resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        let message = body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::debug!("Server rejected session, signing out");
                self.sign_out();
                Err(ClientError::Unauthenticated(message))
            }
            StatusCode::BAD_REQUEST if body["errors"].is_array() => {
                let messages = body["errors"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(|v| v["message"].as_str().map(str::to_string))
                    .collect();
                Err(ClientError::Validation(messages))
            }
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn note_json(id: NoteId, title: &str, priority: Option<&str>) -> Value {
        let mut note = json!({
            "id": id,
            "owner": Uuid::new_v4(),
            "title": title,
            "description": "Some description",
            "created_at": Utc::now(),
        });
        if let Some(p) = priority {
            note["priority"] = json!(p);
        }
        note
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_mirrors_list() {
        let server = MockServer::start().await;
        let (a, b) = (NoteId::new(), NoteId::new());
        Mock::given(method("GET"))
            .and(path("/api/notes"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                note_json(a, "First note", Some("HIGH")),
                note_json(b, "Second note", None),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        let notes = client.fetch_notes().await.unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, a);
        assert_eq!(notes[0].priority, Priority::High);
        // Missing priority reads as LOW
        assert_eq!(notes[1].priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_add_appends_to_mirror() {
        let server = MockServer::start().await;
        let id = NoteId::new();
        Mock::given(method("POST"))
            .and(path("/api/notes"))
            .and(body_json(json!({
                "title": "Hello",
                "description": "World!",
                "priority": "MED",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(note_json(id, "Hello", Some("MED"))),
            )
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        let note = client
            .add_note("Hello", "World!", Priority::Med)
            .await
            .unwrap();

        assert_eq!(note.id, id);
        assert_eq!(client.notes(), &[note]);
    }

    #[tokio::test]
    async fn test_edit_replaces_mirrored_note() {
        let server = MockServer::start().await;
        let id = NoteId::new();
        Mock::given(method("GET"))
            .and(path("/api/notes"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([note_json(id, "Before", None)])),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/api/notes/{}", id)))
            .and(body_json(json!({ "title": "After edit" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(note_json(id, "After edit", None)),
            )
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        client.fetch_notes().await.unwrap();
        let patch = NotePatch {
            title: Some("After edit".to_string()),
            ..Default::default()
        };
        client.edit_note(id, &patch).await.unwrap();

        assert_eq!(client.notes().len(), 1);
        assert_eq!(client.notes()[0].title, "After edit");
    }

    #[tokio::test]
    async fn test_delete_removes_from_mirror() {
        let server = MockServer::start().await;
        let (keep, gone) = (NoteId::new(), NoteId::new());
        Mock::given(method("GET"))
            .and(path("/api/notes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                note_json(keep, "Keep this", None),
                note_json(gone, "Drop this", None),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/api/notes/{}", gone)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "Previous note has been deleted",
                "note": note_json(gone, "Drop this", None),
            })))
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        client.fetch_notes().await.unwrap();
        let deleted = client.delete_note(gone).await.unwrap();

        assert_eq!(deleted.id, gone);
        let ids: Vec<NoteId> = client.notes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[tokio::test]
    async fn test_validation_errors_collected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/notes"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [
                    { "field": "title", "message": "title too short" },
                    { "field": "description", "message": "description too short" },
                ]
            })))
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        let err = client.add_note("Hi", "Yo", Priority::Low).await.unwrap_err();

        match err {
            ClientError::Validation(messages) => {
                assert_eq!(messages, vec!["title too short", "description too short"])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(client.notes().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notes"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })),
            )
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("stale"));
        let err = client.fetch_notes().await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthenticated(ref m) if m == "Invalid token"));
        assert!(!client.session().is_active());

        // Nothing is sent once signed out
        let err = client.fetch_notes().await.unwrap_err();
        assert!(matches!(err, ClientError::NoSession));
    }

    #[tokio::test]
    async fn test_forbidden_keeps_session() {
        let server = MockServer::start().await;
        let id = NoteId::new();
        Mock::given(method("DELETE"))
            .and(path(format!("/api/notes/{}", id)))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "error": "Not allowed" })),
            )
            .mount(&server)
            .await;

        let mut client = NoteClient::new(&server.uri(), Session::new("tok"));
        let err = client.delete_note(id).await.unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Not allowed");
            }
            other => panic!("expected api error, got {:?}", other),
        }
        assert!(client.session().is_active());
    }

    #[tokio::test]
    async fn test_expired_session_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let session = Session::with_expiry("tok", Utc::now() - chrono::Duration::seconds(5));
        let mut client = NoteClient::new(&server.uri(), session);
        assert!(matches!(
            client.fetch_notes().await,
            Err(ClientError::NoSession)
        ));
    }
}
