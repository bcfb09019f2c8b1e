pub mod chat {
    pub mod chat_request;
    pub mod chat_route;
}

pub mod reload {
    pub mod reload_response;
    pub mod reload_route;
}

pub mod health_route;
