use tokio::runtime::Runtime;

fn main() {
    env_logger::init();

    let rt = Runtime::new().expect("Failed to start runtime");
    rt.block_on(privd::run()).expect("Failed to run privd");
}
