use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{DayInput, Plan};
use crate::service::{Caller, TrueStreak};
use crate::store::{Clock, DocumentStore};
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::validation::{require_id, sanitize_days, validate_cycle_name, validate_days};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCycleRequest {
    pub name: String,
    pub days: Vec<DayInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCycleResponse {
    pub success: bool,
    pub cycle_id: String,
    pub cycle: Plan,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCycleRequest {
    pub cycle_id: String,
    pub new_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCycleStructureRequest {
    pub cycle_id: String,
    pub name: String,
    pub days: Vec<DayInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCycleStructureResponse {
    pub success: bool,
    pub new_cycle_id: String,
    pub new_cycle: Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveCycleResponse {
    pub cycle: Option<Plan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleHistoryResponse {
    pub cycles: Vec<Plan>,
}

impl<S: DocumentStore, T: Telemetry, C: Clock> TrueStreak<S, T, C> {
    /// new active plan; the previous active one is archived
    pub fn create_cycle(&self, caller: &Caller, req: CreateCycleRequest) -> ApiResult<CreateCycleResponse> {
        let user_id = caller.require()?;
        validate_cycle_name(&req.name)?;
        validate_days(&req.days)?;

        let mut doc = self.load_user(user_id)?;
        let now = self.clock.now();

        for cycle in doc.cycles.iter_mut().filter(|c| c.is_active) {
            cycle.is_active = false;
            cycle.ended_at = Some(now);
        }

        let cycle = self.new_plan(&req.name, &req.days);
        doc.cycles.push(cycle.clone());
        self.store.update_cycles(user_id, &doc.cycles)?;

        info!(user_id, cycle_id = %cycle.id, days = cycle.days.len(), "cycle created");
        self.telemetry.track(TelemetryEvent::CycleCreated {
            cycle_id: cycle.id.clone(),
            days: cycle.days.len(),
        });

        Ok(CreateCycleResponse {
            success: true,
            cycle_id: cycle.id.clone(),
            cycle,
        })
    }

    pub fn update_cycle_name(&self, caller: &Caller, req: RenameCycleRequest) -> ApiResult<SuccessResponse> {
        let user_id = caller.require()?;
        require_id(&req.cycle_id, "cycleId")?;
        validate_cycle_name(&req.new_name)?;

        let mut doc = self.load_user(user_id)?;
        let cycle = doc
            .cycles
            .iter_mut()
            .find(|c| c.id == req.cycle_id)
            .ok_or_else(|| ApiError::not_found("Ciclo não encontrado"))?;

        if !cycle.is_active {
            return Err(ApiError::FailedPrecondition(
                "Não é possível renomear ciclo inativo".to_string(),
            ));
        }

        cycle.name = req.new_name.trim().to_string();
        self.store.update_cycles(user_id, &doc.cycles)?;

        info!(user_id, cycle_id = %req.cycle_id, "cycle renamed");
        Ok(SuccessResponse { success: true })
    }

    /// editing days archives the plan and starts a fresh copy
    pub fn update_cycle_structure(
        &self,
        caller: &Caller,
        req: UpdateCycleStructureRequest,
    ) -> ApiResult<UpdateCycleStructureResponse> {
        let user_id = caller.require()?;
        require_id(&req.cycle_id, "cycleId")?;
        validate_cycle_name(&req.name)?;
        validate_days(&req.days)?;

        let mut doc = self.load_user(user_id)?;
        let now = self.clock.now();

        let old = doc
            .cycles
            .iter_mut()
            .find(|c| c.id == req.cycle_id)
            .ok_or_else(|| ApiError::not_found("Ciclo não encontrado"))?;

        if !old.is_active {
            return Err(ApiError::FailedPrecondition(
                "Não é possível editar ciclo inativo".to_string(),
            ));
        }
        old.is_active = false;
        old.ended_at = Some(now);

        let cycle = self.new_plan(&req.name, &req.days);
        doc.cycles.push(cycle.clone());
        self.store.update_cycles(user_id, &doc.cycles)?;

        info!(user_id, old_cycle = %req.cycle_id, new_cycle = %cycle.id, "cycle restructured");
        self.telemetry.track(TelemetryEvent::CycleEdited {
            cycle_id: req.cycle_id,
        });

        Ok(UpdateCycleStructureResponse {
            success: true,
            new_cycle_id: cycle.id.clone(),
            new_cycle: cycle,
        })
    }

    pub fn get_active_cycle(&self, caller: &Caller) -> ApiResult<ActiveCycleResponse> {
        let user_id = caller.require()?;
        let doc = self.load_user(user_id)?;
        Ok(ActiveCycleResponse {
            cycle: doc.active_cycle().cloned(),
        })
    }

    /// archived plans, most recently ended first
    pub fn get_cycle_history(&self, caller: &Caller) -> ApiResult<CycleHistoryResponse> {
        let user_id = caller.require()?;
        let doc = self.load_user(user_id)?;

        let mut cycles: Vec<Plan> = doc.cycles.into_iter().filter(|c| !c.is_active).collect();
        cycles.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        Ok(CycleHistoryResponse { cycles })
    }

    fn new_plan(&self, name: &str, days: &[DayInput]) -> Plan {
        Plan {
            id: format!("cycle-{}", Uuid::new_v4()),
            name: name.trim().to_string(),
            is_active: true,
            started_at: self.clock.now(),
            ended_at: None,
            current_position: 0,
            days: sanitize_days(days),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::service::testing::{TestApp, app, caller, day_input};

    fn create(app: &TestApp, name: &str) -> CreateCycleResponse {
        app.create_cycle(
            &caller(),
            CreateCycleRequest {
                name: name.to_string(),
                days: vec![
                    day_input("Treino A", true, &["Supino", "Remada"]),
                    day_input("Treino B", false, &["Agachamento"]),
                ],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_cycle_activates_and_archives_previous() {
        let app = app();
        let first = create(&app, "Ciclo 1");
        app.clock().advance(Duration::days(3));
        let second = create(&app, "  Ciclo 2 ");

        let active = app.get_active_cycle(&caller()).unwrap().cycle.unwrap();
        assert_eq!(active.id, second.cycle_id);
        assert_eq!(active.name, "Ciclo 2");
        assert_eq!(active.days.len(), 2);
        assert_eq!(active.days[1].position, 1);

        let history = app.get_cycle_history(&caller()).unwrap().cycles;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, first.cycle_id);
        assert!(history[0].ended_at.is_some());
        assert_eq!(app.telemetry.names(), vec!["cycle_created", "cycle_created"]);
    }

    #[test]
    fn test_create_cycle_validates_before_loading() {
        let app = app();
        let err = app
            .create_cycle(
                &caller(),
                CreateCycleRequest {
                    name: "Vazio".to_string(),
                    days: Vec::new(),
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(app.get_active_cycle(&caller()).unwrap().cycle.is_none());
    }

    #[test]
    fn test_unknown_user_not_found() {
        let app = app();
        let err = app.get_active_cycle(&Caller::user("ghost")).unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[test]
    fn test_rename_active_only() {
        let app = app();
        let first = create(&app, "Antigo");
        create(&app, "Novo");

        let err = app
            .update_cycle_name(
                &caller(),
                RenameCycleRequest {
                    cycle_id: first.cycle_id,
                    new_name: "X".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "failed-precondition");

        let active = app.get_active_cycle(&caller()).unwrap().cycle.unwrap();
        app.update_cycle_name(
            &caller(),
            RenameCycleRequest {
                cycle_id: active.id,
                new_name: " Renomeado ".to_string(),
            },
        )
        .unwrap();
        let renamed = app.get_active_cycle(&caller()).unwrap().cycle.unwrap();
        assert_eq!(renamed.name, "Renomeado");
    }

    #[test]
    fn test_rename_missing_cycle() {
        let app = app();
        let err = app
            .update_cycle_name(
                &caller(),
                RenameCycleRequest {
                    cycle_id: "cycle-nope".to_string(),
                    new_name: "X".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[test]
    fn test_structure_edit_starts_new_cycle() {
        let app = app();
        let original = create(&app, "Base");
        let res = app
            .update_cycle_structure(
                &caller(),
                UpdateCycleStructureRequest {
                    cycle_id: original.cycle_id.clone(),
                    name: "Base v2".to_string(),
                    days: vec![day_input("Full Body", true, &["Terra"])],
                },
            )
            .unwrap();

        assert_ne!(res.new_cycle_id, original.cycle_id);
        let active = app.get_active_cycle(&caller()).unwrap().cycle.unwrap();
        assert_eq!(active.id, res.new_cycle_id);
        assert_eq!(active.days.len(), 1);

        let history = app.get_cycle_history(&caller()).unwrap().cycles;
        assert_eq!(history[0].id, original.cycle_id);
        assert!(app.telemetry.names().contains(&"cycle_edited"));
    }

    #[test]
    fn test_history_sorted_by_end() {
        let app = app();
        let a = create(&app, "A");
        app.clock().advance(Duration::days(1));
        let b = create(&app, "B");
        app.clock().advance(Duration::days(1));
        create(&app, "C");

        let history = app.get_cycle_history(&caller()).unwrap().cycles;
        let ids: Vec<&str> = history.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![b.cycle_id.as_str(), a.cycle_id.as_str()]);
    }
}
