#[tokio::main]
async fn main() {
    // 日志系统可能尚未初始化，致命错误直接输出到 stderr
    if let Err(e) = keepalive::runtime::run().await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
