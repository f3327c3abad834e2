//! Room-based WebSocket chat relay server.
//!
//! Clients open or join rooms and broadcast messages to every member of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --log-level info
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    domain::SequentialRoomIdGenerator,
    infrastructure::repository::InMemoryRoomRepository,
    ui::Server,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        OpenRoomUseCase, SendMessageUseCase, SessionUseCases,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket chat relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(short = 'l', long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), env!("CARGO_PKG_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repository (empty room registry)
    // 2. UseCases
    // 3. Server

    // 1. Create Repository (in-memory room registry)
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryRoomRepository::new(
        Arc::new(SequentialRoomIdGenerator::new()),
        clock.clone(),
    ));

    // 2. Create UseCases
    let session_usecases = SessionUseCases {
        open_room: Arc::new(OpenRoomUseCase::new(repository.clone())),
        join_room: Arc::new(JoinRoomUseCase::new(repository.clone())),
        leave_room: Arc::new(LeaveRoomUseCase::new(repository.clone())),
        send_message: Arc::new(SendMessageUseCase::new(repository.clone(), clock)),
    };
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 3. Create and run the server
    let server = Server::new(session_usecases, get_rooms_usecase, get_room_detail_usecase);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
