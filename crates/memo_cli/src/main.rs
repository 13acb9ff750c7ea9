//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a memo database (file path argument, in-memory otherwise).
//! - Seed sample memos into an empty database and print the first page.
//!
//! Set `MEMO_LOG_DIR` to an absolute directory to enable file logging.

use log::error;
use memo_core::db::{open_db, open_db_in_memory};
use memo_core::{
    default_log_level, init_logging, MemoRepository, MemoService, PageRequest, Sort, SortField,
    SqliteMemoRepository,
};
use std::error::Error;
use std::process::ExitCode;

const SAMPLE_COUNT: u32 = 100;
const PAGE_SIZE: u32 = 10;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("MEMO_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn)?);

    println!("memo_core ping={}", memo_core::ping());
    println!("memo_core version={}", memo_core::core_version());

    if service.repo().count()? == 0 {
        let seeded = service.register_samples(SAMPLE_COUNT)?;
        println!("seeded={}", seeded.len());
    }

    let request = PageRequest::sorted(0, PAGE_SIZE, Sort::desc(SortField::Mno))?;
    let page = service.page_all(&request)?;
    for memo in page.items() {
        println!("{}\t{}", memo.mno, memo.memo_text);
    }
    println!(
        "page={} total_pages={} total_count={} has_next={} is_first={}",
        page.page_index(),
        page.total_pages(),
        page.total_count(),
        page.has_next(),
        page.is_first()
    );
    Ok(())
}
