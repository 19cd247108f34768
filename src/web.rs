use actix_web::{http::StatusCode, middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use junta_roster::invitation::is_valid_format;
use junta_roster::{AppConfig, Caller, GroupInfo, Junta, JuntaError, MemberData, SlotIndex, SwapRequest};

use crate::display::{card_side, format_member};

// In-memory authority for one junta (persistence lives outside the core)
pub struct AppState {
    pub junta: Junta,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
pub struct ResizeRequest {
    size: usize,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    code: String,
    #[serde(flatten)]
    member: MemberData,
}

#[derive(Deserialize)]
pub struct NumberPair {
    requester_number: String,
    target_number: String,
}

#[derive(Deserialize)]
pub struct ReportRequest {
    document_id: String,
    complaint: String,
}

#[derive(Serialize)]
pub struct RosterResponse {
    version: u64,
    size: usize,
    max_slots: usize,
    vacancies: usize,
    cards: Vec<SlotCard>,
}

#[derive(Serialize)]
pub struct SlotCard {
    index: usize,
    position: usize,
    number: Option<String>,
    title: String,
    name: String,
    label: String,
    side: String,
    is_empty: bool,
}

fn caller_from(req: &HttpRequest, state: &AppState) -> Caller {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if password == state.admin_password {
        Caller::organizer()
    } else {
        Caller::member()
    }
}

fn error_response(err: &JuntaError) -> HttpResponse {
    let status = match err {
        JuntaError::OrganizerRequired => StatusCode::FORBIDDEN,
        JuntaError::NumberNotFound(_) | JuntaError::RequestNotFound { .. } | JuntaError::Empty => {
            StatusCode::NOT_FOUND
        }
        JuntaError::Full { .. } | JuntaError::NothingToDraw => StatusCode::CONFLICT,
        JuntaError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status).json(serde_json::json!({
        "success": false,
        "code": err.code(),
        "error": err.to_string(),
    }))
}

fn forbidden() -> HttpResponse {
    error_response(&JuntaError::OrganizerRequired)
}

// Admin login endpoint
async fn admin_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Roster endpoint: one card per slot
async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.junta.snapshot();

    let cards = snapshot
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| SlotCard {
            index,
            position: index + 1,
            number: slot.draw_label(),
            title: format_member(slot),
            name: slot.display_name.clone(),
            label: slot.member_label().to_string(),
            side: card_side(index + 1).to_string(),
            is_empty: !slot.occupied,
        })
        .collect();

    Ok(HttpResponse::Ok().json(RosterResponse {
        version: snapshot.version,
        size: snapshot.size,
        max_slots: snapshot.max_slots,
        vacancies: snapshot.vacancies,
        cards,
    }))
}

async fn get_info(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.junta.info() {
        Ok(info) => {
            let (start, end) = info.formatted_dates();
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "info": info,
                "amount": info.formatted_amount(),
                "start_date": start,
                "end_date": end,
            })))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update_info(
    req: HttpRequest,
    body: web::Json<GroupInfo>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.update_info(body.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_invitation(state: web::Data<AppState>) -> Result<HttpResponse> {
    let code = match state.junta.invitation_code() {
        Ok(code) => code,
        Err(e) => return Ok(error_response(&e)),
    };
    match state.junta.can_accept_member() {
        Ok(accepting) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "code": code,
            "accepting": accepting,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Join flow: the code is checked here, the roster only sees the verdict
async fn join(body: web::Json<JoinRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let body = body.into_inner();
    let valid = is_valid_format(&body.code);
    if !valid {
        warn!(code = %body.code, "Rejected invitation code");
    }

    match state.junta.join_with_invitation(valid, &body.member) {
        Ok(index) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "position": index.position(),
            "message": format!("Welcome! You were assigned slot #{}", index.position()),
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn resize(
    req: HttpRequest,
    body: web::Json<ResizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.resize(body.size) {
        Ok(outcome) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "size": outcome.report.new_size,
            "discarded": outcome.report.discarded.len(),
            "invalidated_requests": outcome.invalidated,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn edit_slot(
    req: HttpRequest,
    path: web::Path<usize>,
    body: web::Json<MemberData>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.edit_slot(SlotIndex::new(path.into_inner()), &body) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn release_slot(
    req: HttpRequest,
    path: web::Path<usize>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.release_slot(SlotIndex::new(path.into_inner())) {
        Ok(released) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "released": released.display_name,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn run_lottery(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.run_lottery() {
        Ok(drawn) => {
            let assignments: Vec<serde_json::Value> = drawn
                .iter()
                .map(|(index, number)| serde_json::json!({"position": index.position(), "number": number}))
                .collect();
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "assignments": assignments})))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

// Organizer's direct exchange
async fn exchange(
    req: HttpRequest,
    body: web::Json<NumberPair>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !caller_from(&req, &state).is_organizer {
        return Ok(forbidden());
    }
    match state.junta.exchange_numbers(&body.requester_number, &body.target_number) {
        Ok(receipt) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "receipt": receipt}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn submit_request(body: web::Json<NumberPair>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.junta.submit_swap(&body.requester_number, &body.target_number) {
        Ok(request) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "request": request}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn next_request(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.junta.next_pending(caller_from(&req, &state)) {
        Ok(request) => Ok(HttpResponse::Ok().json(request)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn approve_request(
    req: HttpRequest,
    body: web::Json<NumberPair>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let caller = caller_from(&req, &state);
    let request = match SwapRequest::new(body.requester_number.as_str(), body.target_number.as_str()) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(&e)),
    };
    match state.junta.approve(caller, &request) {
        Ok(receipt) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "receipt": receipt}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn reject_request(
    req: HttpRequest,
    body: web::Json<NumberPair>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let caller = caller_from(&req, &state);
    let request = match SwapRequest::new(body.requester_number.as_str(), body.target_number.as_str()) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(&e)),
    };
    match state.junta.reject(caller, &request) {
        Ok(rejected) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "rejected": rejected}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn file_report(body: web::Json<ReportRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.junta.file_report(&body.document_id, &body.complaint) {
        Ok(report) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "report": report}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn list_reports(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.junta.reports(caller_from(&req, &state)) {
        Ok(reports) => Ok(HttpResponse::Ok().json(reports)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/roster", web::get().to(get_roster))
        .route("/api/roster/resize", web::post().to(resize))
        .service(
            web::resource("/api/roster/slots/{index}")
                .route(web::put().to(edit_slot))
                .route(web::delete().to(release_slot)),
        )
        .route("/api/info", web::get().to(get_info))
        .route("/api/info", web::put().to(update_info))
        .route("/api/invitation", web::get().to(get_invitation))
        .route("/api/join", web::post().to(join))
        .route("/api/lottery", web::post().to(run_lottery))
        .route("/api/exchange", web::post().to(exchange))
        .route("/api/requests", web::post().to(submit_request))
        .route("/api/requests/next", web::get().to(next_request))
        .route("/api/requests/approve", web::post().to(approve_request))
        .route("/api/requests/reject", web::post().to(reject_request))
        .route("/api/reports", web::post().to(file_report))
        .route("/api/reports", web::get().to(list_reports));
}

pub async fn start_server(config: AppConfig) -> std::io::Result<()> {
    let info = GroupInfo::new(config.group_name.clone(), 10_000, Default::default());
    let junta = Junta::new(info, config.policy)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app_state = web::Data::new(AppState {
        junta,
        admin_password: config.admin_password,
    });

    info!(port = config.port, "Starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use junta_roster::{Currency, RosterPolicy};

    const PASSWORD: &str = "secret";

    fn state(size: usize) -> web::Data<AppState> {
        web::Data::new(AppState {
            junta: Junta::new(
                GroupInfo::new("Web junta", 5_000, Currency::Soles),
                RosterPolicy::default().with_initial_size(size),
            )
            .unwrap(),
            admin_password: PASSWORD.to_string(),
        })
    }

    #[actix_web::test]
    async fn member_cannot_resize() {
        let app = test::init_service(App::new().app_data(state(3)).configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/roster/resize")
            .set_json(serde_json::json!({"size": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn organizer_resizes_and_roster_reflects_it() {
        let app = test::init_service(App::new().app_data(state(3)).configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/roster/resize")
            .insert_header(("X-Admin-Password", PASSWORD))
            .set_json(serde_json::json!({"size": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/roster").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["size"], 5);
        assert_eq!(body["cards"][0]["label"], "Administrator");
        assert_eq!(body["cards"][1]["side"], "right");
        assert_eq!(body["cards"][4]["is_empty"], true);
    }

    #[actix_web::test]
    async fn join_needs_a_valid_code() {
        let app = test::init_service(App::new().app_data(state(3)).configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/join")
            .set_json(serde_json::json!({"code": "nope", "name": "Ana"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/join")
            .set_json(serde_json::json!({"code": "SAVI-1234", "name": "Ana", "phone": "987654321"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["position"], 2);
    }

    #[actix_web::test]
    async fn invitation_reports_code_and_room() {
        let app = test::init_service(App::new().app_data(state(2)).configure(routes)).await;
        let req = test::TestRequest::get().uri("/api/invitation").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["code"].as_str().unwrap().starts_with("SAVI-"));
        assert_eq!(body["accepting"], true);
    }

    #[actix_web::test]
    async fn reports_are_filed_by_anyone_and_read_by_the_organizer() {
        let app = test::init_service(App::new().app_data(state(3)).configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(serde_json::json!({"document_id": "12345678", "complaint": ""}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/reports")
            .set_json(serde_json::json!({"document_id": "12345678", "complaint": "Missed payment"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/reports").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/reports")
            .insert_header(("X-Admin-Password", PASSWORD))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["document_id"], "12345678");
    }

    #[actix_web::test]
    async fn request_review_cycle() {
        let data = state(3);
        data.junta.fill_vacancy(&MemberData::named("Ana")).unwrap();
        data.junta.fill_vacancy(&MemberData::named("Beto")).unwrap();
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/requests")
            .set_json(serde_json::json!({"requester_number": "2", "target_number": "3"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/requests/next").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/requests/approve")
            .insert_header(("X-Admin-Password", PASSWORD))
            .set_json(serde_json::json!({"requester_number": "2", "target_number": "3"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let snapshot = data.junta.snapshot();
        assert_eq!(snapshot.slots[1].draw_number, Some(3));
        assert_eq!(snapshot.slots[2].draw_number, Some(2));

        let req = test::TestRequest::get()
            .uri("/api/requests/next")
            .insert_header(("X-Admin-Password", PASSWORD))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "empty");
    }

    #[actix_web::test]
    async fn organizer_number_cannot_be_exchanged() {
        let data = state(3);
        data.junta.fill_vacancy(&MemberData::named("Ana")).unwrap();
        let app = test::init_service(App::new().app_data(data).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/exchange")
            .insert_header(("X-Admin-Password", PASSWORD))
            .set_json(serde_json::json!({"requester_number": "1", "target_number": "2"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], "organizer_number_protected");
    }
}
