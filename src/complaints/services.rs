use tracing::info;

use crate::{
    complaints::{
        allocator::next_id, dto::NewComplaint, repo::ComplaintStore, repo_types::Complaint,
    },
    error::{AppError, AppResult},
    outcome::UpdateOutcome,
};

pub async fn list_complaints(
    store: &dyn ComplaintStore,
    anonymize: bool,
) -> AppResult<Vec<Complaint>> {
    let all = store.list_all().await?;
    if anonymize {
        return Ok(all.into_iter().map(Complaint::anonymized).collect());
    }
    Ok(all)
}

pub async fn get_complaint(store: &dyn ComplaintStore, id: &str) -> AppResult<Complaint> {
    store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("complaint {id}")))
}

/// Persist a new complaint under a server-allocated id.
pub async fn file_complaint(
    store: &dyn ComplaintStore,
    input: NewComplaint,
) -> AppResult<Complaint> {
    let id = next_id(store).await?;
    let complaint = input.into_complaint(id);
    store.create(&complaint).await?;
    info!(
        complaint_id = %complaint.id,
        student_id = %complaint.student_id,
        category = %complaint.category,
        "complaint filed"
    );
    Ok(complaint)
}

pub async fn delete_complaint(store: &dyn ComplaintStore, id: &str) -> AppResult<UpdateOutcome> {
    let out = store.delete(id).await?;
    if out.matched {
        info!(complaint_id = %id, "complaint deleted");
    }
    Ok(out)
}
