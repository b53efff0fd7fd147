use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use acadex_core::pagination::{PaginationMeta, PaginationParams};

use crate::modules::appointments::model::{
    Appointment, AppointmentStatus, CreateAppointmentDto, PaginatedAppointmentsResponse,
    UpdateAppointmentStatusDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterRequestDto};
use crate::modules::classes::model::{Class, CreateClassDto, UpdateClassDto};
use crate::modules::courses::model::{
    Course, CourseWithMaterials, CreateCourseDto, UpdateCourseDto,
};
use crate::modules::material_types::model::{
    CreateMaterialTypeDto, MaterialType, UpdateMaterialTypeDto,
};
use crate::modules::materials::model::{CreateMaterialDto, Material, UpdateMaterialDto};
use crate::modules::messages::model::{
    CreateMessageDto, Message, PaginatedMessagesResponse, ReplyMessageDto,
};
use crate::modules::premium_content::model::{
    CreatePremiumContentDto, PremiumContent, UpdatePremiumContentDto,
};
use crate::modules::settings::model::{SettingValue, UpdateSettingsDto};
use crate::modules::stats::model::{StatsCounts, StatsResponse};
use crate::modules::uploads::model::UploadResponse;
use crate::modules::users::model::{
    PaginatedUsersResponse, UpdateUserStatusDto, User, UserStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::update_user_status,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class_by_id,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::subscribe_to_course,
        crate::modules::material_types::controller::create_material_type,
        crate::modules::material_types::controller::get_material_types,
        crate::modules::material_types::controller::update_material_type,
        crate::modules::material_types::controller::delete_material_type,
        crate::modules::materials::controller::create_material,
        crate::modules::materials::controller::get_materials,
        crate::modules::materials::controller::update_material,
        crate::modules::materials::controller::delete_material,
        crate::modules::premium_content::controller::create_premium_content,
        crate::modules::premium_content::controller::get_premium_content,
        crate::modules::premium_content::controller::update_premium_content,
        crate::modules::premium_content::controller::delete_premium_content,
        crate::modules::settings::controller::get_settings,
        crate::modules::settings::controller::update_settings,
        crate::modules::messages::controller::create_message,
        crate::modules::messages::controller::get_messages,
        crate::modules::messages::controller::get_message_by_id,
        crate::modules::messages::controller::reply_to_message,
        crate::modules::messages::controller::delete_message,
        crate::modules::appointments::controller::create_appointment,
        crate::modules::appointments::controller::get_appointments,
        crate::modules::appointments::controller::get_my_appointments,
        crate::modules::appointments::controller::update_appointment_status,
        crate::modules::appointments::controller::delete_appointment,
        crate::modules::uploads::controller::upload_file,
        crate::modules::stats::controller::get_stats,
    ),
    components(
        schemas(
            User,
            UserStatus,
            UpdateUserStatusDto,
            PaginatedUsersResponse,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            Class,
            CreateClassDto,
            UpdateClassDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            CourseWithMaterials,
            MaterialType,
            CreateMaterialTypeDto,
            UpdateMaterialTypeDto,
            Material,
            CreateMaterialDto,
            UpdateMaterialDto,
            PremiumContent,
            CreatePremiumContentDto,
            UpdatePremiumContentDto,
            SettingValue,
            UpdateSettingsDto,
            Message,
            CreateMessageDto,
            ReplyMessageDto,
            PaginatedMessagesResponse,
            Appointment,
            AppointmentStatus,
            CreateAppointmentDto,
            UpdateAppointmentStatusDto,
            PaginatedAppointmentsResponse,
            UploadResponse,
            StatsResponse,
            StatsCounts,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration, and session resolution"),
        (name = "Users", description = "Admin user management"),
        (name = "Classes", description = "Top-level catalog groupings"),
        (name = "Courses", description = "Courses and their aggregate reads"),
        (name = "Material Types", description = "Material groupings inside a course"),
        (name = "Materials", description = "Study material files"),
        (name = "Premium Content", description = "Paid offerings attached to courses"),
        (name = "Settings", description = "Site configuration key/value store"),
        (name = "Messages", description = "Contact-form messages"),
        (name = "Appointments", description = "Tutoring appointment bookings"),
        (name = "Uploads", description = "Media uploads"),
        (name = "Stats", description = "Admin dashboard aggregates")
    ),
    info(
        title = "Acadex API",
        version = "0.1.0",
        description = "Backend API for the Acadex tutoring academy site and admin dashboard.",
        contact(
            name = "API Support",
            email = "support@acadex.academy"
        ),
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
