//! Writes TypeScript definitions for the API's request and response types.
//!
//! The output directory is `TMS_TS_OUTPUT_DIR` if set, otherwise
//! `../ts-bindings`. Stale `.ts` files there are removed first.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        let output_dir_str =
            env::var("TMS_TS_OUTPUT_DIR").unwrap_or_else(|_| "../ts-bindings".to_string());
        let output_dir = Path::new(&output_dir_str);

        if output_dir.exists() {
            for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
                let path = entry.expect("Failed to read directory entry").path();
                if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                    std::fs::remove_file(&path)
                        .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
                }
            }
        } else {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::api::login::{LoginSuccessResponse, MessageResponse, SessionValidResponse};
        use crate::api::status::HealthStatus;
        use crate::error::ErrorResponse;
        use crate::models::*;

        // Scheduling entities
        Course::export().expect("Failed to export Course type");
        Subject::export().expect("Failed to export Subject type");
        Batch::export().expect("Failed to export Batch type");
        Section::export().expect("Failed to export Section type");
        Room::export().expect("Failed to export Room type");
        Faculty::export().expect("Failed to export Faculty type");
        Timetable::export().expect("Failed to export Timetable type");
        Timeslot::export().expect("Failed to export Timeslot type");
        Lecture::export().expect("Failed to export Lecture type");
        LectureKey::export().expect("Failed to export LectureKey type");
        LectureDetail::export().expect("Failed to export LectureDetail type");
        NewLecture::export().expect("Failed to export NewLecture type");
        LectureChanges::export().expect("Failed to export LectureChanges type");
        Session::export().expect("Failed to export Session type");
        SessionStatus::export().expect("Failed to export SessionStatus type");
        SessionNote::export().expect("Failed to export SessionNote type");
        User::export().expect("Failed to export User type");
        Role::export().expect("Failed to export Role type");

        // Request and response bodies
        CalendarFilters::export().expect("Failed to export CalendarFilters type");
        DaySummary::export().expect("Failed to export DaySummary type");
        RosterRow::export().expect("Failed to export RosterRow type");
        MonthSummaryResponse::export().expect("Failed to export MonthSummaryResponse type");
        DayRosterResponse::export().expect("Failed to export DayRosterResponse type");
        MarkSessionRequest::export().expect("Failed to export MarkSessionRequest type");
        SessionNoteInput::export().expect("Failed to export SessionNoteInput type");
        LoginSuccessResponse::export().expect("Failed to export LoginSuccessResponse type");
        SessionValidResponse::export().expect("Failed to export SessionValidResponse type");
        MessageResponse::export().expect("Failed to export MessageResponse type");
        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
