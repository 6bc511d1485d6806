// Router tests driven through the full middleware stack over the in-memory store

pub mod test_utils {
    use std::sync::Arc;

    use axum::{ body::Body, http::{ header, Request, Response }, Router };
    use chrono::{ NaiveDate, NaiveDateTime };
    use http_body_util::BodyExt;

    use crate::{
        config::Config,
        middleware::{ cookies::SESSION_COOKIE_NAME, session::SessionData },
        models::{ LoginEmployee, NewEmployee, NewReport, Report },
        repositories::{ DataStore, EmployeeRepository, MemoryStore, ReportRepository },
        routes::create_router,
        AppState,
    };

    pub const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    pub struct TestApp {
        pub state: Arc<AppState>,
        pub store: MemoryStore,
        pub router: Router,
    }

    pub fn setup_test_app() -> TestApp {
        let store = MemoryStore::new();
        let state = Arc::new(
            AppState::with_store(Config::for_testing(), Arc::new(store.clone())).expect(
                "Failed to build test state"
            )
        );
        let router = create_router(state.clone());

        TestApp { state, store, router }
    }

    fn timestamp(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").expect("valid timestamp")
    }

    /// Adds an employee whose password is not a usable hash.
    pub fn create_test_employee(store: &MemoryStore, code: &str, name: &str) -> LoginEmployee {
        let now = timestamp("2024-01-01T00:00");
        let employee = store
            .open()
            .expect("open store")
            .create_employee(NewEmployee {
                code: code.to_string(),
                name: name.to_string(),
                password: "not-a-hash".to_string(),
                admin_flag: false,
                created_at: now,
                updated_at: now,
                delete_flag: false,
            })
            .expect("Failed to create test employee");

        LoginEmployee::from(&employee)
    }

    pub fn create_test_report(store: &MemoryStore, owner: &LoginEmployee, title: &str) -> Report {
        let now = timestamp("2024-01-02T20:00");
        store
            .open()
            .expect("open store")
            .create(NewReport {
                employee_id: owner.id,
                report_date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
                title: title.to_string(),
                content: "original content".to_string(),
                created_at: now,
                updated_at: now,
                start_time: timestamp("2024-01-02T09:00"),
                finish_time: timestamp("2024-01-02T18:00"),
            })
            .expect("Failed to create test report")
    }

    /// Session id of a logged-in session holding `TOKEN` as its form token.
    pub async fn login_session(app: &TestApp, employee: &LoginEmployee) -> String {
        app.state.sessions.insert(SessionData {
            login_employee: Some(employee.clone()),
            flash: None,
            csrf_token: Some(TOKEN.to_string()),
        }).await
    }

    pub fn get(uri: &str, session_id: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(id) = session_id {
            builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE_NAME, id));
        }
        builder.body(Body::empty()).expect("request")
    }

    pub fn post_form(uri: &str, session_id: Option<&str>, form: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(id) = session_id {
            builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE_NAME, id));
        }
        builder.body(Body::from(form.to_string())).expect("request")
    }

    pub async fn body_string(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    pub fn location(response: &Response<Body>) -> Option<&str> {
        response.headers().get(header::LOCATION).and_then(|value| value.to_str().ok())
    }

    /// Session id from the response's Set-Cookie header, if one was set.
    pub fn session_cookie(response: &Response<Body>) -> Option<String> {
        let pattern = regex::Regex::new(&format!("{}=([0-9a-f]+)", SESSION_COOKIE_NAME)).ok()?;

        response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| pattern.captures(value).map(|caps| caps[1].to_string()))
    }

    pub fn scrape_token(html: &str) -> String {
        let pattern = regex::Regex::new(r#"name="_token" value="([0-9a-f]+)""#).expect("regex");
        pattern.captures(html).expect("token field in page")[1].to_string()
    }
}

mod report_routes {
    use axum::http::StatusCode;
    use chrono::Local;
    use tower::ServiceExt;

    use super::test_utils::*;
    use crate::dto::report_dtos::DATE_FORMAT;

    const VALID_FORM: &str = "title=Daily&content=did+work\
        &start_time=2024-01-01T09%3A00&finish_time=2024-01-01T18%3A00";

    #[tokio::test]
    async fn create_defaults_the_date_and_flashes_once() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let response = app.router
            .clone()
            .oneshot(get("/reports/new", Some(&session))).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = scrape_token(&body_string(response).await);

        let form = format!("_token={}&report_date=&{}", token, VALID_FORM);
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/reports"));

        let reports = app.store.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].report_date, Local::now().date_naive());
        assert_eq!(reports[0].employee_id, employee.id);
        assert_eq!(reports[0].title, "Daily");

        let first = body_string(
            app.router.clone().oneshot(get("/reports", Some(&session))).await.unwrap()
        ).await;
        assert!(first.contains("Registration completed."));
        assert!(first.contains("Daily"));

        let second = body_string(
            app.router.clone().oneshot(get("/reports", Some(&session))).await.unwrap()
        ).await;
        assert!(!second.contains("Registration completed."));
    }

    #[tokio::test]
    async fn finish_before_start_re_renders_the_form() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let form = format!(
            "_token={}&report_date=2024-01-01&title=Daily&content=did+work\
             &start_time=2024-01-01T18%3A00&finish_time=2024-01-01T09%3A00",
            TOKEN
        );
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("id=\"errors\""));
        assert!(html.contains("The finish time must not be earlier than the start time."));
        assert!(html.contains("value=\"Daily\""));
        assert!(app.store.reports().is_empty());
    }

    #[tokio::test]
    async fn blank_submission_lists_every_missing_field() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let form = format!("_token={}&start_time=yesterday", TOKEN);
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Please enter a title."));
        assert!(html.contains("Please enter the report content."));
        assert!(html.contains("Please enter the start time"));
        assert!(html.contains("value=\"yesterday\""));
        assert!(app.store.reports().is_empty());
    }

    #[tokio::test]
    async fn owner_field_in_the_form_is_ignored() {
        let app = setup_test_app();
        let victim = create_test_employee(&app.store, "E001", "Taro");
        let author = create_test_employee(&app.store, "E002", "Hanako");
        let session = login_session(&app, &author).await;

        let form = format!("_token={}&employee_id={}&{}", TOKEN, victim.id, VALID_FORM);
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.store.reports()[0].employee_id, author.id);
    }

    #[tokio::test]
    async fn missing_token_is_forbidden() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), VALID_FORM)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("id=\"error-message\""));
        assert!(app.store.reports().is_empty());
    }

    #[tokio::test]
    async fn anonymous_create_redirects_to_login() {
        let app = setup_test_app();

        let response = app.router
            .clone()
            .oneshot(post_form("/reports", None, VALID_FORM)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/login"));
        assert!(app.store.reports().is_empty());
    }

    #[tokio::test]
    async fn show_missing_report_renders_the_error_view() {
        let app = setup_test_app();

        for uri in ["/reports/999", "/reports/abc"] {
            let response = app.router.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert!(
                body_string(response).await.contains("The requested page could not be found")
            );
        }
    }

    #[tokio::test]
    async fn show_offers_edit_to_the_owner_only() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let other = create_test_employee(&app.store, "E002", "Hanako");
        let report = create_test_report(&app.store, &owner, "Owner day plan");
        let uri = format!("/reports/{}", report.id);
        let edit_link = format!("/reports/{}/edit", report.id);

        let anonymous = body_string(app.router.clone().oneshot(get(&uri, None)).await.unwrap()).await;
        assert!(anonymous.contains("Owner day plan"));
        assert!(!anonymous.contains(&edit_link));

        let other_session = login_session(&app, &other).await;
        let html = body_string(
            app.router.clone().oneshot(get(&uri, Some(&other_session))).await.unwrap()
        ).await;
        assert!(!html.contains(&edit_link));

        let owner_session = login_session(&app, &owner).await;
        let html = body_string(
            app.router.clone().oneshot(get(&uri, Some(&owner_session))).await.unwrap()
        ).await;
        assert!(html.contains(&edit_link));
    }

    #[tokio::test]
    async fn non_owner_cannot_open_the_edit_form() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let other = create_test_employee(&app.store, "E002", "Hanako");
        let report = create_test_report(&app.store, &owner, "Private plans");
        let session = login_session(&app, &other).await;

        let response = app.router
            .clone()
            .oneshot(get(&format!("/reports/{}/edit", report.id), Some(&session))).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_string(response).await;
        assert!(html.contains("id=\"error-message\""));
        assert!(!html.contains("Private plans"));
    }

    #[tokio::test]
    async fn non_owner_update_changes_nothing() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let other = create_test_employee(&app.store, "E002", "Hanako");
        let report = create_test_report(&app.store, &owner, "Private plans");
        let session = login_session(&app, &other).await;

        let form = format!("_token={}&report_date=2024-02-01&{}", TOKEN, VALID_FORM);
        let response = app.router
            .clone()
            .oneshot(post_form(&format!("/reports/{}", report.id), Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!body_string(response).await.contains("Private plans"));
        assert_eq!(app.store.reports()[0].title, "Private plans");
    }

    #[tokio::test]
    async fn owner_updates_the_report() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let report = create_test_report(&app.store, &owner, "Draft");
        let session = login_session(&app, &owner).await;
        let edit_uri = format!("/reports/{}/edit", report.id);

        let response = app.router.clone().oneshot(get(&edit_uri, Some(&session))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("value=\"Draft\""));
        assert!(html.contains("value=\"2024-01-02T09:00\""));
        let token = scrape_token(&html);

        let form = format!(
            "_token={}&report_date=2024-02-01&title=Final&content=done\
             &start_time=2024-02-01T08%3A30&finish_time=2024-02-01T17%3A30",
            token
        );
        let response = app.router
            .clone()
            .oneshot(post_form(&format!("/reports/{}", report.id), Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/reports"));

        let stored = &app.store.reports()[0];
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.report_date.format(DATE_FORMAT).to_string(), "2024-02-01");
        assert_eq!(stored.employee_id, owner.id);
        assert_eq!(stored.created_at, report.created_at);

        let html = body_string(
            app.router.clone().oneshot(get("/reports", Some(&session))).await.unwrap()
        ).await;
        assert!(html.contains("Update completed."));
    }

    #[tokio::test]
    async fn update_with_blank_date_is_rejected() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let report = create_test_report(&app.store, &owner, "Draft");
        let session = login_session(&app, &owner).await;

        let form = format!("_token={}&report_date=&{}", TOKEN, VALID_FORM);
        let response = app.router
            .clone()
            .oneshot(post_form(&format!("/reports/{}", report.id), Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Please enter the report date"));
        assert_eq!(app.store.reports()[0].title, "Draft");
    }

    #[tokio::test]
    async fn index_pages_newest_first() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        for n in 1..=16 {
            create_test_report(&app.store, &owner, &format!("Report number {}", n));
        }

        let first = body_string(app.router.clone().oneshot(get("/reports", None)).await.unwrap()).await;
        assert!(first.contains("16 report(s)"));
        assert!(first.contains("Report number 16"));
        assert!(!first.contains("Report number 1<"));
        assert!(first.contains("href=\"/reports?page=2\""));

        let second = body_string(
            app.router.clone().oneshot(get("/reports?page=2", None)).await.unwrap()
        ).await;
        assert!(second.contains("Report number 1<"));
        assert!(!second.contains("Report number 16"));

        let fallback = body_string(
            app.router.clone().oneshot(get("/reports?page=zero", None)).await.unwrap()
        ).await;
        assert!(fallback.contains("Report number 16"));
    }

    #[tokio::test]
    async fn huge_page_number_still_renders_the_list() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        create_test_report(&app.store, &owner, "Only report");

        let response = app.router
            .clone()
            .oneshot(get("/reports?page=9223372036854775807", None)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("1 report(s)"));
        assert!(!html.contains("Only report"));
    }

    #[tokio::test]
    async fn padded_title_at_the_limit_is_saved_trimmed() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;
        let title = "t".repeat(255);

        let form = format!(
            "_token={}&title={}+&content=+did+work+\
             &start_time=2024-01-01T09%3A00&finish_time=2024-01-01T18%3A00",
            TOKEN,
            title
        );
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let stored = &app.store.reports()[0];
        assert_eq!(stored.title, title);
        assert_eq!(stored.content, "did work");
    }

    #[tokio::test]
    async fn overlong_title_is_a_validation_error() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let form = format!(
            "_token={}&title={}&content=did+work\
             &start_time=2024-01-01T09%3A00&finish_time=2024-01-01T18%3A00",
            TOKEN,
            "t".repeat(256)
        );
        let response = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Titles must not be more than 255 characters."));
        assert!(app.store.reports().is_empty());
    }

    #[tokio::test]
    async fn update_without_a_valid_token_is_forbidden() {
        let app = setup_test_app();
        let owner = create_test_employee(&app.store, "E001", "Taro");
        let report = create_test_report(&app.store, &owner, "Draft");
        let uri = format!("/reports/{}", report.id);

        for token_field in ["", "_token=forged&"] {
            let session = login_session(&app, &owner).await;
            let form = format!("{}report_date=2024-02-01&{}", token_field, VALID_FORM);
            let response = app.router
                .clone()
                .oneshot(post_form(&uri, Some(&session), &form)).await
                .unwrap();

            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert!(body_string(response).await.contains("id=\"error-message\""));
        }

        assert_eq!(app.store.reports()[0].title, "Draft");
    }

    #[tokio::test]
    async fn edit_of_missing_report_renders_the_error_view() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        for uri in ["/reports/999/edit", "/reports/abc/edit"] {
            let response = app.router.clone().oneshot(get(uri, Some(&session))).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert!(
                body_string(response).await.contains("The requested page could not be found")
            );
        }
    }

    #[tokio::test]
    async fn replayed_form_is_forbidden() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;
        let form = format!("_token={}&{}", TOKEN, VALID_FORM);

        let first = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let replay = app.router
            .clone()
            .oneshot(post_form("/reports", Some(&session), &form)).await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.store.reports().len(), 1);
    }
}

mod auth_routes {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::test_utils::*;
    use crate::services::auth_service::AuthService;

    #[tokio::test]
    async fn login_rotates_the_session_and_greets_the_employee() {
        let app = setup_test_app();
        AuthService::register(&app.store, "E100", "Sachiko", "correct horse", false).unwrap();

        let response = app.router.clone().oneshot(get("/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let anonymous_session = session_cookie(&response).expect("session cookie");
        let token = scrape_token(&body_string(response).await);

        let form = format!("_token={}&code=E100&password=correct+horse", token);
        let response = app.router
            .clone()
            .oneshot(post_form("/login", Some(&anonymous_session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/reports"));
        let logged_in_session = session_cookie(&response).expect("rotated session cookie");
        assert_ne!(logged_in_session, anonymous_session);

        let html = body_string(
            app.router.clone().oneshot(get("/reports", Some(&logged_in_session))).await.unwrap()
        ).await;
        assert!(html.contains("Logged in."));
        assert!(html.contains("Sachiko (E100)"));
    }

    #[tokio::test]
    async fn wrong_password_re_renders_the_login_form() {
        let app = setup_test_app();
        AuthService::register(&app.store, "E100", "Sachiko", "correct horse", false).unwrap();

        let response = app.router.clone().oneshot(get("/login", None)).await.unwrap();
        let session = session_cookie(&response).expect("session cookie");
        let token = scrape_token(&body_string(response).await);

        let form = format!("_token={}&code=E100&password=battery", token);
        let response = app.router
            .clone()
            .oneshot(post_form("/login", Some(&session), &form)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Employee code or password is incorrect."));
        assert!(html.contains("value=\"E100\""));
    }

    #[tokio::test]
    async fn logout_clears_the_identity() {
        let app = setup_test_app();
        let employee = create_test_employee(&app.store, "E001", "Taro");
        let session = login_session(&app, &employee).await;

        let response = app.router
            .clone()
            .oneshot(post_form("/logout", Some(&session), &format!("_token={}", TOKEN))).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/login"));
        assert!(app.state.sessions.get(&session).await.is_none());

        let fresh = session_cookie(&response).expect("new session cookie");
        let html = body_string(app.router.clone().oneshot(get("/login", Some(&fresh))).await.unwrap()).await;
        assert!(html.contains("Logged out."));
    }
}

mod general_routes {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::test_utils::*;

    #[tokio::test]
    async fn health_and_root() {
        let app = setup_test_app();

        let response = app.router.clone().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");

        let response = app.router.clone().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/reports"));
    }

    #[tokio::test]
    async fn unknown_paths_get_the_error_page_with_security_headers() {
        let app = setup_test_app();

        let response = app.router.clone().oneshot(get("/nowhere", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("content-security-policy"));
        assert!(body_string(response).await.contains("id=\"error-message\""));
    }
}
