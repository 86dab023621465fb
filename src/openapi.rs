use utoipa::OpenApi;

use crate::models::{Booking, BookingStatus, Class, MembershipStatus, ScheduleData, Studio, Teacher, User};
use crate::schedule::LoadStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::api_index,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_schedule,
        crate::handlers::list_classes,
        crate::handlers::get_class
    ),
    components(schemas(
        ScheduleData,
        Class,
        Studio,
        Teacher,
        User,
        MembershipStatus,
        Booking,
        BookingStatus,
        LoadStatus
    )),
    tags(
        (name = "schedule", description = "Black Swan Yoga class schedule")
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_schedule_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/schedule"));
        assert!(doc.paths.paths.contains_key("/api/classes"));
        assert!(doc.paths.paths.contains_key("/api/classes/{id}"));
        let schemas = &doc.components.unwrap().schemas;
        assert!(schemas.contains_key("Class"));
        assert!(schemas.contains_key("Booking"));
    }
}
