use std::sync::Arc;

use axum::extract::{Path, State};
use notes_axum::{ApiJson, CurrentUser, NotesAxumError, ValidJson};

use crate::db::notes::Note;

use super::notes_shared::{parse_note_id, CreateNote, UpdateNote};
use super::NotesService;

pub async fn find(
    State(notes): State<Arc<NotesService>>,
    user: CurrentUser,
) -> Result<ApiJson<Vec<Note>>, NotesAxumError> {
    Ok(ApiJson::ok(notes.find(&user.tenant()).await?))
}

pub async fn create(
    State(notes): State<Arc<NotesService>>,
    user: CurrentUser,
    ValidJson(data): ValidJson<CreateNote>,
) -> Result<ApiJson<Note>, NotesAxumError> {
    Ok(ApiJson::created(notes.create(&user.tenant(), data).await?))
}

pub async fn get(
    State(notes): State<Arc<NotesService>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiJson<Note>, NotesAxumError> {
    let id = parse_note_id(&id)?;
    Ok(ApiJson::ok(notes.get(&user.tenant(), id).await?))
}

pub async fn update(
    State(notes): State<Arc<NotesService>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidJson(data): ValidJson<UpdateNote>,
) -> Result<ApiJson<Note>, NotesAxumError> {
    let id = parse_note_id(&id)?;
    Ok(ApiJson::ok(notes.update(&user.tenant(), id, data).await?))
}

pub async fn remove(
    State(notes): State<Arc<NotesService>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<ApiJson<&'static str>, NotesAxumError> {
    let id = parse_note_id(&id)?;
    notes.remove(&user.tenant(), id).await?;
    Ok(ApiJson::ok("Note deleted"))
}
