//! 用户服务主入口

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use user_service::{
    auth::{PasswordHasher, TokenCodec},
    config::AppConfig,
    db,
    middleware::AppState,
    repository::{InMemoryUserStore, PgUserRepository, UserStore},
    routes,
    services::UserService,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("user-service {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境），生产环境直接设置环境变量
    if let Ok(env) = std::env::var("USERSVC_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "User service starting...");

    // 3. 用户存储
    let store: Arc<dyn UserStore> = match &config.database.url {
        Some(url) => {
            let pool = db::create_pool(url, &config.database).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Database initialized");
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            tracing::warn!("No database URL configured, using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    // 4. 构建应用状态（签名密钥在此创建，进程内不再变化）
    let token_codec = Arc::new(TokenCodec::from_config(&config)?);
    let user_service = Arc::new(UserService::new(
        store,
        PasswordHasher::new(),
        token_codec.clone(),
    ));

    let app_state = Arc::new(AppState {
        config: config.clone(),
        token_codec,
        user_service,
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 在途请求超时未完成则强制退出
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("user-service {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: user-service [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印帮助信息并退出");
    println!();
    println!("环境变量（前缀 USERSVC_，层级用 __ 分隔）:");
    println!("  USERSVC_SERVER__ADDR              监听地址（默认 0.0.0.0:8080）");
    println!("  USERSVC_DATABASE__URL             PostgreSQL 连接串（缺省使用内存存储）");
    println!("  USERSVC_LOGGING__LEVEL            日志级别（默认 info）");
    println!("  USERSVC_LOGGING__FORMAT           日志格式 json|pretty|plain（默认 json）");
    println!("  USERSVC_SECURITY__JWT_SECRET      令牌签名密钥（必填，至少 32 字符）");
    println!("  USERSVC_SECURITY__TOKEN_TTL_SECS  令牌有效期（默认 86400）");
}
