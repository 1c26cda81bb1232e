use paracord_http::protocol::{HttpMethod, StatusCode};
use paracord_web::middleware::{ContentNegotiation, EntityTag};
use paracord_web::router::RouteValue;
use paracord_web::server::RouteHandler;
use paracord_web::Server;
use std::sync::Arc;

// curl -v http://127.0.0.1:8080/api/users/42
// curl -v http://127.0.0.1:8080/api/users/not-a-number   (404)
// curl -v --compressed http://127.0.0.1:8080/home/index
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::builder()
        .prefix("http://localhost:8080")?
        .middleware(ContentNegotiation)
        .middleware(EntityTag)
        .register_controller(
            "{controller=home}",
            vec![RouteHandler::new(
                "{action=index}",
                HttpMethod::Get,
                Arc::new(|_req, route, response| {
                    let action = route.parameter("action").map(ToString::to_string).unwrap_or_default();
                    response.set_body(format!("welcome to {action}\r\n"));
                }),
            )],
        )?
        .register_controller(
            "api/users",
            vec![
                RouteHandler::new(
                    "{id}",
                    HttpMethod::Get,
                    Arc::new(|_req, route, response| match route.parameter("id") {
                        Some(RouteValue::Str(id)) if id.bytes().all(|b| b.is_ascii_digit()) => {
                            response.set_body(format!("user #{id}\r\n"));
                        }
                        _ => response.set_status(StatusCode::NotFound),
                    }),
                ),
                RouteHandler::new(
                    "",
                    HttpMethod::Post,
                    Arc::new(|req, _route, response| {
                        response.set_status(StatusCode::Created);
                        response.set_body(format!("created from {} bytes\r\n", req.body().len()));
                    }),
                ),
            ],
        )?
        .build();

    server.start().await?;
    Ok(())
}
