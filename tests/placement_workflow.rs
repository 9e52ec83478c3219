//! End-to-end specifications for the placement-offer workflow, driven
//! through the public service facade and the HTTP router so the
//! eligibility rules, ownership guard, and session guard are exercised
//! the way the admin screens hit them.

mod common {
    use std::sync::Arc;

    use placement_cell::auth::AuthPolicy;
    use placement_cell::placements::{
        placement_router, NewStudent, OfferDraft, PlacementService, Student,
    };
    use placement_cell::storage::memory::InMemoryPlacementStore;

    pub(crate) const ADMIN_TOKEN: &str = "cell-secret";

    pub(crate) fn build_service() -> Arc<PlacementService<InMemoryPlacementStore>> {
        Arc::new(PlacementService::new(Arc::new(
            InMemoryPlacementStore::default(),
        )))
    }

    pub(crate) fn build_router(
        service: Arc<PlacementService<InMemoryPlacementStore>>,
    ) -> axum::Router {
        placement_router(service, AuthPolicy::with_token(ADMIN_TOKEN))
    }

    pub(crate) fn enroll(
        service: &PlacementService<InMemoryPlacementStore>,
        roll: &str,
        cgpa: f64,
    ) -> Student {
        service
            .register_student(NewStudent {
                roll_number: roll.to_string(),
                name: format!("Student {roll}"),
                department: "CSE".to_string(),
                batch: "2026".to_string(),
                section: Some("A".to_string()),
                email: None,
                mobile: None,
                cgpa: Some(cgpa),
                current_arrears: 0,
                history_of_arrears: None,
            })
            .expect("student registers")
    }

    pub(crate) fn accepted_offer(company: &str, ctc: &str) -> OfferDraft {
        OfferDraft {
            company: company.to_string(),
            job_title: "Graduate Engineer".to_string(),
            ctc: Some(ctc.to_string()),
            job_type: Some("FTE".to_string()),
            is_accepted: Some(true),
            ..OfferDraft::default()
        }
    }
}

mod eligibility {
    use super::common::*;
    use placement_cell::placements::PlacementStatus;

    #[test]
    fn dream_offer_acceptance_closes_the_season() {
        let service = build_service();
        let student = enroll(&service, "21CS101", 8.0);

        service
            .record_offer(&student.id, accepted_offer("Acme", "7.0 LPA"))
            .expect("offer records");

        let detail = service.get_student(&student.id).expect("student loads");
        assert_eq!(detail.student.placement_status, PlacementStatus::PlacedFinal);
        assert!(!detail.student.can_sit_for_more);
        assert_eq!(detail.student.final_placed_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn sub_threshold_acceptance_keeps_the_student_in_the_pool() {
        let service = build_service();
        let student = enroll(&service, "21CS102", 8.0);

        service
            .record_offer(&student.id, accepted_offer("Acme", "5.5 LPA"))
            .expect("offer records");

        let detail = service.get_student(&student.id).expect("student loads");
        assert_eq!(detail.student.placement_status, PlacementStatus::Placed);
        assert!(detail.student.can_sit_for_more);
        assert_eq!(detail.student.final_placed_ctc.as_deref(), Some("5.5 LPA"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn offer_body(company: &str, ctc: &str) -> Body {
        Body::from(
            serde_json::to_vec(&json!({
                "company": company,
                "jobTitle": "Graduate Engineer",
                "ctc": ctc,
                "isAccepted": true,
            }))
            .expect("serialize offer"),
        )
    }

    #[tokio::test]
    async fn recording_an_offer_requires_a_session() {
        let service = build_service();
        let student = enroll(&service, "21CS110", 8.0);
        let router = build_router(service);

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/students/{}/placements", student.id.0))
            .header("content-type", "application/json")
            .body(offer_body("Acme", "7.0 LPA"))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn accepted_offer_round_trips_through_the_api() {
        let service = build_service();
        let student = enroll(&service, "21CS111", 8.0);
        let router = build_router(service.clone());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/students/{}/placements", student.id.0))
            .header("content-type", "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(offer_body("Acme", "7.0 LPA"))
            .expect("request");

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            payload.get("offerStatus").and_then(Value::as_str),
            Some("ACCEPTED")
        );

        let fetch = Request::builder()
            .method("GET")
            .uri(format!("/api/v1/students/{}", student.id.0))
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(Body::empty())
            .expect("request");

        let response = router.oneshot(fetch).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            payload.get("placementStatus").and_then(Value::as_str),
            Some("PLACED_FINAL")
        );
        assert_eq!(
            payload.get("canSitForMore").and_then(Value::as_bool),
            Some(false)
        );
        assert_eq!(
            payload.get("finalPlacedCompany").and_then(Value::as_str),
            Some("Acme")
        );
    }

    #[tokio::test]
    async fn foreign_placements_cannot_be_updated_through_the_api() {
        let service = build_service();
        let owner = enroll(&service, "21CS112", 8.0);
        let intruder = enroll(&service, "21CS113", 8.0);
        let offer = service
            .record_offer(
                &owner.id,
                placement_cell::placements::OfferDraft {
                    company: "Acme".to_string(),
                    job_title: "Graduate Engineer".to_string(),
                    ..Default::default()
                },
            )
            .expect("offer records");
        let router = build_router(service);

        let request = Request::builder()
            .method("PUT")
            .uri(format!(
                "/api/v1/students/{}/placements/{}",
                intruder.id.0, offer.id.0
            ))
            .header("content-type", "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(Body::from(
                serde_json::to_vec(&json!({ "isAccepted": true })).expect("serialize patch"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        // Ownership mismatch is indistinguishable from a missing row.
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_fields_in_a_student_patch_are_rejected() {
        let service = build_service();
        let student = enroll(&service, "21CS114", 8.0);
        let router = build_router(service);

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/students/{}", student.id.0))
            .header("content-type", "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(Body::from(
                serde_json::to_vec(&json!({ "canSitForMore": true }))
                    .expect("serialize patch"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        // The flag is engine-derived; the boundary refuses to take it.
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod roster {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn roster_import_reports_imported_and_skipped_rows() {
        let service = build_service();
        let router = build_router(service);

        let csv = "Roll Number,Name,Department,Batch\n\
                   21CS120,Asha Verma,CSE,2026\n\
                   21CS120,Asha Verma,CSE,2026\n";

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/students/import")
            .header("content-type", "text/csv")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(Body::from(csv))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("imported").and_then(Value::as_u64), Some(1));
        assert_eq!(
            payload
                .get("skipped")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }
}
