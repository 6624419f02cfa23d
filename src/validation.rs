//! Input checks shared by the plan, workout and feedback handlers.
//!
//! Every check runs before any state is touched.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CompletedExercise, DayInput, Exercise, ExerciseInput, PlanDay};

pub const MAX_CYCLE_NAME: usize = 100;
pub const MAX_DAY_NAME: usize = 100;
pub const MAX_EXERCISE_NAME: usize = 200;
pub const MAX_DAYS: usize = 14;
pub const MIN_FEEDBACK: usize = 10;
pub const MAX_FEEDBACK: usize = 5000;
pub const MAX_REVIEW_COMMENT: usize = 500;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_cycle_name(name: &str) -> ApiResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid("Nome do ciclo não pode ser vazio"));
    }
    if char_len(trimmed) > MAX_CYCLE_NAME {
        return Err(ApiError::invalid("Nome do ciclo muito longo (máx 100 caracteres)"));
    }
    Ok(())
}

pub fn validate_exercise(exercise: &ExerciseInput, day: usize, position: usize) -> ApiResult<()> {
    let name = exercise.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid(format!(
            "Dia {}, Exercício {}: nome é obrigatório",
            day + 1,
            position + 1
        )));
    }
    if char_len(name) > MAX_EXERCISE_NAME {
        return Err(ApiError::invalid(format!(
            "Dia {}, Exercício {}: nome muito longo",
            day + 1,
            position + 1
        )));
    }
    Ok(())
}

pub fn validate_day(day: &DayInput, position: usize) -> ApiResult<()> {
    let name = day.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid(format!("Dia {}: nome é obrigatório", position + 1)));
    }
    if char_len(name) > MAX_DAY_NAME {
        return Err(ApiError::invalid(format!("Dia {}: nome muito longo", position + 1)));
    }
    for (i, exercise) in day.exercises.iter().enumerate() {
        validate_exercise(exercise, position, i)?;
    }
    Ok(())
}

pub fn validate_days(days: &[DayInput]) -> ApiResult<()> {
    if days.is_empty() {
        return Err(ApiError::invalid("Ciclo precisa ter pelo menos 1 dia"));
    }
    if days.len() > MAX_DAYS {
        return Err(ApiError::invalid("Ciclo não pode ter mais de 14 dias"));
    }
    for (i, day) in days.iter().enumerate() {
        validate_day(day, i)?;
    }
    Ok(())
}

fn id_or_new(id: &Option<String>, prefix: &str) -> String {
    match id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}-{}", prefix, Uuid::new_v4()),
    }
}

/// trim strings, fill missing ids, renumber positions
pub fn sanitize_days(days: &[DayInput]) -> Vec<PlanDay> {
    days.iter()
        .enumerate()
        .map(|(position, day)| PlanDay {
            id: id_or_new(&day.id, "day"),
            position,
            name: day.name.trim().to_string(),
            is_mandatory: day.is_mandatory,
            exercises: day
                .exercises
                .iter()
                .map(|ex| Exercise {
                    id: id_or_new(&ex.id, "ex"),
                    name: ex.name.trim().to_string(),
                    sets_reps: ex.sets_reps.as_deref().unwrap_or_default().trim().to_string(),
                    notes: ex.notes.as_deref().unwrap_or_default().trim().to_string(),
                })
                .collect(),
        })
        .collect()
}

pub fn require_id(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(format!("{} é obrigatório", field)));
    }
    Ok(())
}

/// every entry needs an id, and ids may not repeat
pub fn validate_completed_exercises(exercises: &[CompletedExercise]) -> ApiResult<()> {
    let mut seen = HashSet::new();
    for (i, exercise) in exercises.iter().enumerate() {
        if exercise.exercise_id.trim().is_empty() {
            return Err(ApiError::invalid(format!(
                "completedExercises[{}]: exerciseId é obrigatório",
                i
            )));
        }
        if !seen.insert(exercise.exercise_id.as_str()) {
            return Err(ApiError::invalid(format!(
                "completedExercises[{}]: exercício repetido",
                i
            )));
        }
    }
    Ok(())
}

pub fn validate_feedback_message(message: &str) -> ApiResult<String> {
    let trimmed = message.trim();
    if char_len(trimmed) < MIN_FEEDBACK {
        return Err(ApiError::invalid("Mensagem muito curta. Mínimo 10 caracteres."));
    }
    if char_len(trimmed) > MAX_FEEDBACK {
        return Err(ApiError::invalid("Mensagem muito longa. Máximo 5000 caracteres."));
    }
    Ok(trimmed.to_string())
}

pub fn validate_rating(rating: u8) -> ApiResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::invalid("Rating deve ser entre 1 e 5 estrelas"));
    }
    Ok(())
}

/// trimmed comment, None when blank
pub fn validate_review_comment(comment: Option<&str>) -> ApiResult<Option<String>> {
    let Some(comment) = comment.map(str::trim) else {
        return Ok(None);
    };
    if char_len(comment) > MAX_REVIEW_COMMENT {
        return Err(ApiError::invalid("Comentário muito longo. Máximo 500 caracteres."));
    }
    Ok((!comment.is_empty()).then(|| comment.to_string()))
}
