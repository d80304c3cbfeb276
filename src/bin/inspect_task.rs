use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    fewshot_tasks::apps::run_inspect_task(std::env::args().skip(1))
}
