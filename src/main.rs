use fortunes_algorithm::diagram::Diagram;
use fortunes_algorithm::rectangle::Rectangle;
use fortunes_algorithm::vector2::Site;
use fortunes_algorithm::compute;

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info))
}

fn main() {
    init().expect("Failed to initialise logger");

    let mut sites = HashSet::new();
    sites.insert(Site::new(70.0, 50.0));
    sites.insert(Site::new(20.0, 20.0));
    sites.insert(Site::new(40.0, 30.0));
    sites.insert(Site::new(80.0, 90.0));

    let clip = Rectangle::from_bounds(0.0, 0.0, 100.0, 100.0);
    let mut diagram = Diagram::new();
    let finished = compute(&sites, &mut diagram, clip, -1);

    log::info!(
        "diagram finished = {}, cells = {}, vertices = {}",
        finished,
        diagram.cell_count(),
        diagram.vertices().len()
    );
}
