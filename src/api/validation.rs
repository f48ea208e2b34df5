use super::ApiError;
use crate::domain::{Provider, WorkflowId};

/// Upper bound for a stored custom prompt.
const MAX_PROMPT_CHARS: usize = 10_000;

const MAX_TITLE_CHARS: usize = 200;

pub fn validate_workflow_id(id: i32) -> Result<WorkflowId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid workflow ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(WorkflowId::new(id))
}

pub fn validate_provider(name: &str) -> Result<Provider, ApiError> {
    name.parse::<Provider>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

pub fn validate_upload_content(content: &str) -> Result<&str, ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("Workflow file is empty"));
    }
    Ok(content)
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(format!(
            "Title must be {MAX_TITLE_CHARS} characters or less"
        )));
    }
    Ok(trimmed)
}

pub fn validate_prompt(prompt: &str) -> Result<&str, ApiError> {
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(ApiError::validation(format!(
            "Prompt must be {MAX_PROMPT_CHARS} characters or less"
        )));
    }
    Ok(prompt)
}
