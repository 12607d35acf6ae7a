// Integration tests for the feature endpoints

mod common;

use aarogya_rs_client::symptoms::CheckerStep;
use aarogya_rs_client::{
    ActivityLevel, ClientError, DietPlanRequest, Gender, Meal, ProfileUpdate, RegisterRequest,
    ReportFile, Severity, Symptom, SymptomChecker,
};
use common::{client_for, session, PROFILE_BODY};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_register_and_verify() {
    let mut server = mockito::Server::new_async().await;
    let register = server
        .mock("POST", "/auth/register/")
        .match_body(Matcher::Json(json!({
            "username": "asha",
            "email": "asha@example.com",
            "password": "s3cret!",
            "password2": "s3cret!"
        })))
        .with_status(201)
        .with_body(r#"{"message": "User registered successfully. Please check your email for OTP."}"#)
        .expect(1)
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/auth/verify-otp/")
        .match_body(Matcher::Json(json!({"email": "asha@example.com", "otp": "123456"})))
        .with_status(200)
        .with_body(r#"{"message": "Account verified successfully.", "access": "access-1", "refresh": "refresh-1"}"#)
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), None);
    let registered = client
        .register(&RegisterRequest {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "s3cret!".to_string(),
            password2: "s3cret!".to_string(),
        })
        .await
        .unwrap();
    assert!(registered.message.unwrap().contains("OTP"));

    let verification = client.verify_otp("asha@example.com", " 123456 ").await.unwrap();
    assert!(verification.signed_in);
    assert_eq!(client.token_store().get().unwrap(), session());

    register.assert_async().await;
    verify.assert_async().await;
}

#[tokio::test]
async fn test_validation_never_reaches_backend() {
    let mut server = mockito::Server::new_async().await;
    let any = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));

    let mismatch = client
        .register(&RegisterRequest {
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "one".to_string(),
            password2: "two".to_string(),
        })
        .await;
    assert!(matches!(mismatch, Err(ClientError::Validation(_))));
    assert!(client.verify_otp("asha@example.com", "12ab56").await.is_err());
    assert!(client.login("not-an-email", "pw").await.is_err());
    assert!(client.log_weight(-3.0).await.is_err());
    assert!(client
        .update_profile(&ProfileUpdate {
            age: Some(0),
            gender: Some(Gender::Female),
            weight_kg: Some(60.0),
            height_cm: Some(160.0),
        })
        .await
        .is_err());

    any.assert_async().await;
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let fetch = server
        .mock("GET", "/auth/profile/")
        .with_status(200)
        .with_body(PROFILE_BODY)
        .expect(1)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/auth/profile/")
        .match_header("authorization", "Bearer access-1")
        .match_body(Matcher::PartialJson(json!({"age": 35, "gender": "Female"})))
        .with_status(200)
        .with_body(
            r#"{"username": "asha", "email": "asha@example.com", "age": 35,
                "gender": "Female", "weight_kg": "61.00", "height_cm": "165.00"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));
    let profile = client.get_profile().await.unwrap();
    assert!(profile.is_complete());
    assert_eq!(profile.weight_kg, Some(62.5));

    let mut changes = profile.to_update();
    changes.age = Some(35);
    changes.weight_kg = Some(61.0);
    let updated = client.update_profile(&changes).await.unwrap();

    assert_eq!(updated.age, Some(35));
    assert_eq!(updated.bmi().unwrap().rounded(), 22.4);

    fetch.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_dashboard_and_logging() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/dashboard/data/")
        .with_status(200)
        .with_body(
            r#"{
                "user": {"username": "asha"},
                "health_snapshot": {"bmi": {"value": "N/A", "category": "Please complete your profile"}, "bmr": {"value": "N/A"}},
                "weight_progress": [{"weight_kg": 63.0, "timestamp": "2025-03-01"}, {"weight_kg": 62.4, "timestamp": "2025-03-04"}],
                "symptom_history": [],
                "diet_tracker": {}
            }"#,
        )
        .create_async()
        .await;
    let weight = server
        .mock("POST", "/dashboard/log-weight/")
        .match_body(Matcher::Json(json!({"weight": 62.1})))
        .with_status(201)
        .with_body(r#"{"weight_kg": "62.10", "timestamp": "2025-03-05"}"#)
        .expect(1)
        .create_async()
        .await;
    let meal = server
        .mock("POST", "/dashboard/log-meal/")
        .match_body(Matcher::Json(json!({"meal": "lunch_completed", "status": true})))
        .with_status(200)
        .with_body(r#"{"date": "2025-03-05", "breakfast_completed": true, "lunch_completed": true, "dinner_completed": false}"#)
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));
    let data = client.dashboard_data().await.unwrap();

    assert!(data.health_snapshot.bmi.value.as_f64().is_none());
    let trend = data.weight_trend();
    assert_eq!(trend.days_logged(), 2);
    assert!((trend.net_change().unwrap() + 0.6).abs() < 1e-9);
    assert_eq!(data.diet_tracker.clone().unwrap_or_default().completed_meals(), 0);

    client.log_weight(62.1).await.unwrap();
    let tracker = client.log_meal(Meal::Lunch, true).await.unwrap();
    assert_eq!(tracker.completed_meals(), 2);

    weight.assert_async().await;
    meal.assert_async().await;
}

#[tokio::test]
async fn test_medicine_search() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", Matcher::Regex(r"^/medicines/search/".to_string()))
        .match_query(Matcher::UrlEncoded("search".to_string(), "para cetamol".to_string()))
        .with_status(200)
        .with_body(
            r#"[
                {"medicine_name": "Paracetamol", "medicine_type": "Tablet", "treats_disease": "Fever"},
                {"medicine_name": "Crocin", "source": "Online lookup"}
            ]"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));
    let results = client.search_medicines("  para cetamol ").await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_catalogued());
    assert!(!results[1].is_catalogued());
    assert!(client.search_medicines("p").await.is_err());
    search.assert_async().await;
}

#[tokio::test]
async fn test_diet_plan() {
    let mut server = mockito::Server::new_async().await;
    let plan = server
        .mock("POST", "/diet-plans/generate/")
        .match_body(Matcher::Json(json!({
            "age": 30,
            "gender": "Male",
            "weight": 80.0,
            "height": 180.0,
            "activity_level": "Moderately Active"
        })))
        .with_status(200)
        .with_body(
            r#"{"bmi": 24.69, "bmi_category": "Normal weight", "bmr": 1780.0,
                "diet_plan": "Eat well", "workout_plan": "Walk daily"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));
    let generated = client
        .generate_diet_plan(&DietPlanRequest {
            age: 30,
            gender: Gender::Male,
            weight: 80.0,
            height: 180.0,
            activity_level: ActivityLevel::ModeratelyActive,
        })
        .await
        .unwrap();

    assert_eq!(generated.bmi_category, "Normal weight");
    assert_eq!(generated.workout_plan, "Walk daily");
    plan.assert_async().await;
}

#[tokio::test]
async fn test_symptom_checker_flow() {
    let mut server = mockito::Server::new_async().await;
    let check = server
        .mock("POST", "/symptoms/check/")
        .match_body(Matcher::PartialJson(json!({
            "age": 28,
            "gender": "Female",
            "primary_symptom_duration": "4-7 days",
            "fever": 3,
            "cough": 2,
            "rash": 0
        })))
        .with_status(200)
        .with_body(
            r#"{
                "predicted_disease": "Influenza",
                "confidence": 0.82,
                "top_3_predictions": [["Influenza", 0.82], ["Common Cold", 0.11], ["COVID-19", 0.04]],
                "allopathic_treatment": {"medicine_name": "Oseltamivir"},
                "ayurvedic_treatment": {"medicine_name": "Giloy"}
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (client, _) = client_for(&server.url(), Some(session()));
    let mut checker = SymptomChecker::new();
    assert!(checker.next_step().is_err());

    checker.form.age = Some(28);
    checker.form.gender = Gender::Female;
    checker.form.duration = aarogya_rs_client::SymptomDuration::FourToSevenDays;
    assert_eq!(checker.next_step().unwrap(), CheckerStep::Symptoms);

    checker.form.rate(Symptom::Fever, Severity::Severe);
    checker.form.rate(Symptom::Cough, Severity::Moderate);
    let result = checker.submit(&client).await.unwrap();

    assert_eq!(result.predicted_disease, "Influenza");
    assert_eq!(result.top_3_predictions.len(), 3);
    assert_eq!(result.allopathic_treatment.medicine_name.as_deref(), Some("Oseltamivir"));
    assert_eq!(checker.step(), CheckerStep::Result);

    checker.reset();
    assert_eq!(checker.step(), CheckerStep::Demographics);
    check.assert_async().await;
}

#[tokio::test]
async fn test_report_upload_is_replayed_after_refresh() {
    let mut server = mockito::Server::new_async().await;
    let expired = server
        .mock("POST", "/reports/analyze/")
        .match_header("authorization", "Bearer access-1")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/token/refresh/")
        .with_status(200)
        .with_body(r#"{"access": "access-2"}"#)
        .create_async()
        .await;
    let analyzed = server
        .mock("POST", "/reports/analyze/")
        .match_header("authorization", "Bearer access-2")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::Regex(r#"name="report_file"; filename="cbc.pdf""#.to_string()))
        .with_status(200)
        .with_body(r#"{"analysis": "Haemoglobin is within range."}"#)
        .expect(1)
        .create_async()
        .await;

    let (client, navigator) = client_for(&server.url(), Some(session()));
    let report = ReportFile::new("cbc.pdf", b"%PDF-1.7 report".to_vec()).unwrap();
    let analysis = client.analyze_report(&report).await.unwrap();

    assert_eq!(analysis, "Haemoglobin is within range.");
    assert_eq!(navigator.redirects(), 0);
    expired.assert_async().await;
    analyzed.assert_async().await;
}
