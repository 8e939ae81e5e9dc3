pub mod auth {
    pub mod handle;
    pub mod handshake;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod route;
    pub mod service;
    pub mod session;
}

pub mod user {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod material {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod tag {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod workflow {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod invite_code {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_http;
    pub mod handle;
    pub mod service;
    pub mod route;
}
