//! The cascading authorization decision.
//!
//! Stages run in a fixed order and the first one that grants wins:
//!
//! 1. platform roles held directly (`PROMPT_Admin`, `PROMPT_Lecturer`)
//! 2. deny without any lookup when nothing but platform roles is accepted
//! 3. course lecturer, course editor and custom roles, via the phase role mapping
//! 4. students of the phase, via the enrollment lookup
//! 5. deny
//!
//! Lookups only happen in the stage that needs them, and their results are
//! kept in the [`RoleContext`] so later stages and handlers reuse them.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, error, info};
use uuid::Uuid;

use prompt_auth::{
    AllowedRoles, COURSE_EDITOR, COURSE_LECTURER, PROMPT_ADMIN, PROMPT_LECTURER,
    PhaseParticipation, PhaseRoles, RoleContext,
};
use prompt_core::AppError;
use prompt_observability::track_authorization_decision;

use crate::core_service::{Caller, CoreRequestError, ParticipationFetcher, PhaseRoleFetcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DirectGrant,
    PlatformOnly,
    PhaseRole,
    CustomRole,
    Student,
    FinalDenial,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::DirectGrant => "direct_grant",
            Stage::PlatformOnly => "platform_only",
            Stage::PhaseRole => "phase_role",
            Stage::CustomRole => "custom_role",
            Stage::Student => "student",
            Stage::FinalDenial => "final_denial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Stage),
    Deny(Stage),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn stage(self) -> Stage {
        match self {
            Decision::Allow(stage) | Decision::Deny(stage) => stage,
        }
    }
}

/// Message of every authorization denial.
pub const DENIED_MESSAGE: &str = "could not authenticate";

/// Parses the `coursePhaseID` path parameter. Absent, malformed and nil ids
/// are client errors.
pub fn parse_course_phase_id(raw: Option<&str>) -> Result<Uuid, AppError> {
    let raw = raw.ok_or_else(|| AppError::bad_request(anyhow!("coursePhaseID missing")))?;
    let id = Uuid::parse_str(raw).map_err(|e| {
        error!(course_phase_id = %raw, error = %e, "Error parsing coursePhaseID");
        AppError::bad_request(anyhow!("invalid coursePhaseID: {}", e))
    })?;
    if id.is_nil() {
        return Err(AppError::bad_request(anyhow!("coursePhaseID missing")));
    }
    Ok(id)
}

#[derive(Clone)]
pub struct AuthorizationDecider {
    roles: Arc<dyn PhaseRoleFetcher>,
    participation: Arc<dyn ParticipationFetcher>,
}

impl AuthorizationDecider {
    pub fn new(
        roles: Arc<dyn PhaseRoleFetcher>,
        participation: Arc<dyn ParticipationFetcher>,
    ) -> Self {
        Self {
            roles,
            participation,
        }
    }

    /// Decides whether the caller in `ctx` may proceed.
    ///
    /// `authorization` is the caller's header, forwarded to the core on
    /// lookups. `raw_course_phase_id` is the unparsed path parameter; it is
    /// only read once a phase-scoped stage runs.
    ///
    /// Errors are client input (400) or lookup failures (500). A lookup
    /// failure aborts the decision; it never counts as a denial.
    pub async fn decide(
        &self,
        allowed: &AllowedRoles,
        ctx: &mut RoleContext,
        authorization: &str,
        raw_course_phase_id: Option<&str>,
    ) -> Result<Decision, AppError> {
        let result = self
            .run_stages(allowed, ctx, authorization, raw_course_phase_id)
            .await;

        match &result {
            Ok(decision) => {
                let outcome = if decision.is_allowed() { "allow" } else { "deny" };
                debug!(user_id = %ctx.user().id, stage = decision.stage().as_str(), outcome, "Authorization decided");
                track_authorization_decision(decision.stage().as_str(), outcome);
            }
            Err(e) => {
                track_authorization_decision("aborted", "error");
                if e.is_server_error() {
                    error!(user_id = %ctx.user().id, error = %e.message(), "Authorization aborted");
                }
            }
        }

        result
    }

    async fn run_stages(
        &self,
        allowed: &AllowedRoles,
        ctx: &mut RoleContext,
        authorization: &str,
        raw_course_phase_id: Option<&str>,
    ) -> Result<Decision, AppError> {
        for role in [PROMPT_ADMIN, PROMPT_LECTURER] {
            if allowed.contains(role) && ctx.has_role(role) {
                return Ok(Decision::Allow(Stage::DirectGrant));
            }
        }

        // Routes without a course phase can be guarded by platform roles alone.
        if allowed.only_platform_roles() {
            return Ok(Decision::Deny(Stage::PlatformOnly));
        }

        if allowed.requires_phase_roles() {
            let course_phase_id = course_phase_id(ctx, raw_course_phase_id)?;
            self.ensure_phase_roles(ctx, authorization, course_phase_id)
                .await?;

            if allowed.contains(COURSE_LECTURER) && ctx.is_lecturer() {
                return Ok(Decision::Allow(Stage::PhaseRole));
            }
            if allowed.contains(COURSE_EDITOR) && ctx.is_editor() {
                return Ok(Decision::Allow(Stage::PhaseRole));
            }
            if allowed.custom_roles().any(|role| ctx.holds_custom_role(role)) {
                return Ok(Decision::Allow(Stage::CustomRole));
            }
        }

        if allowed.allows_student() {
            let course_phase_id = course_phase_id(ctx, raw_course_phase_id)?;
            self.ensure_participation(ctx, authorization, course_phase_id)
                .await?;

            if ctx.is_student_of_phase() {
                return Ok(Decision::Allow(Stage::Student));
            }
        }

        Ok(Decision::Deny(Stage::FinalDenial))
    }

    async fn ensure_phase_roles(
        &self,
        ctx: &mut RoleContext,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<(), AppError> {
        if ctx.phase_roles().is_some() {
            return Ok(());
        }

        let caller = Caller {
            authorization,
            user_id: &ctx.user().id,
        };
        let mapping = self
            .roles
            .fetch_course_roles(&caller, course_phase_id)
            .await
            .map_err(|e| {
                error!(course_phase_id = %course_phase_id, error = %e, "Error getting course roles");
                AppError::from(e)
            })?;

        let roles = PhaseRoles::for_user(
            ctx.user(),
            &mapping.course_lecturer_role,
            &mapping.course_editor_role,
            mapping.custom_role_prefix,
        );
        ctx.set_phase_roles(roles);
        Ok(())
    }

    async fn ensure_participation(
        &self,
        ctx: &mut RoleContext,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<(), AppError> {
        if ctx.participation().is_some() {
            return Ok(());
        }

        let caller = Caller {
            authorization,
            user_id: &ctx.user().id,
        };
        let participation = match self
            .participation
            .fetch_student_of_phase(&caller, course_phase_id)
            .await
        {
            Ok(answer) => PhaseParticipation {
                is_student_of_phase: answer.is_student_of_course_phase,
                course_participation_id: answer.course_participation_id,
            },
            Err(CoreRequestError::NotEnrolled) => {
                info!(course_phase_id = %course_phase_id, "Caller is not a student of the course");
                PhaseParticipation::not_enrolled()
            }
            Err(e) => {
                error!(course_phase_id = %course_phase_id, error = %e, "Error getting student status");
                return Err(e.into());
            }
        };

        ctx.set_participation(participation);
        Ok(())
    }
}

/// The phase id is parsed once per request and kept in the context.
fn course_phase_id(ctx: &mut RoleContext, raw: Option<&str>) -> Result<Uuid, AppError> {
    if let Some(id) = ctx.course_phase_id() {
        return Ok(id);
    }
    let id = parse_course_phase_id(raw)?;
    ctx.set_course_phase_id(id);
    Ok(id)
}
