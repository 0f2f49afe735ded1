use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{LoginRequest, LoginResponse};
use dakbook_core::{PaginationMeta, PaginationParams};
use dakbook_models::audit::{AuditLog, AuditLogFilterParams, PaginatedAuditLogsResponse};
use dakbook_models::mails::{
    BulkDeleteMailsDto, CreateMailDto, Mail, MailDirection, MailDirectionCount, MailFilterParams,
    PaginatedMailsResponse, UpdateMailDto,
};
use dakbook_models::masters::{
    CreateMasterDto, MasterFilterParams, MasterKind, MasterRecord, PaginatedMastersResponse,
    UpdateMasterDto,
};
use dakbook_models::teams::{
    CreateTeamDto, PaginatedTeamsResponse, Team, TeamFilterParams, UpdateTeamDto,
};
use dakbook_models::users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::logout,
        crate::modules::mails::controller::list_mails,
        crate::modules::mails::controller::get_mail,
        crate::modules::mails::controller::create_mail,
        crate::modules::mails::controller::update_mail,
        crate::modules::mails::controller::delete_mail,
        crate::modules::mails::controller::delete_many_mails,
        crate::modules::masters::controller::list_masters,
        crate::modules::masters::controller::get_master,
        crate::modules::masters::controller::create_master,
        crate::modules::masters::controller::update_master,
        crate::modules::masters::controller::delete_master,
        crate::modules::teams::controller::list_teams,
        crate::modules::teams::controller::get_team,
        crate::modules::teams::controller::create_team,
        crate::modules::teams::controller::update_team,
        crate::modules::teams::controller::delete_team,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::audit_logs::controller::list_audit_logs,
        crate::pages::dashboard_page,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            UserFilterParams,
            PaginatedUsersResponse,
            Team,
            CreateTeamDto,
            UpdateTeamDto,
            TeamFilterParams,
            PaginatedTeamsResponse,
            Mail,
            MailDirection,
            MailDirectionCount,
            CreateMailDto,
            UpdateMailDto,
            MailFilterParams,
            BulkDeleteMailsDto,
            PaginatedMailsResponse,
            MasterKind,
            MasterRecord,
            CreateMasterDto,
            UpdateMasterDto,
            MasterFilterParams,
            PaginatedMastersResponse,
            AuditLog,
            AuditLogFilterParams,
            PaginatedAuditLogsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, logout, and session inspection"),
        (name = "Mails", description = "Inward and outward correspondence records"),
        (name = "Masters", description = "Reference data: offices, modes, couriers, correspondents"),
        (name = "Teams", description = "Team (tenant) management, super admin only"),
        (name = "Users", description = "User account management"),
        (name = "Audit Logs", description = "Read-only audit trail"),
        (name = "Pages", description = "Browser-facing pages")
    ),
    info(
        title = "Dakbook API",
        version = "0.1.0",
        description = "A multi-tenant office correspondence registry built with Rust, Axum, and PostgreSQL featuring JWT-based authentication and a full audit trail.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
