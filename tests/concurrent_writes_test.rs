//! Concurrency tests: many writer threads racing the rotation monitor

mod common;

use chrono::NaiveDate;
use common::{count_lines, temp_dir};
use rollover::{Level, Logger, ManualClock, RotationMode};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;
const WRITES_PER_THREAD: usize = 250;

fn all_files(logger: &Logger) -> Vec<std::path::PathBuf> {
    let mut files = logger.backups();
    files.push(logger.active_path().to_path_buf());
    files
}

#[test]
fn test_no_lines_lost_under_size_rotation() {
    let dir = temp_dir();
    let logger = Arc::new(
        Logger::builder(dir.path(), "busy.log")
            .rotation(RotationMode::SizeBounded {
                // Large enough that nothing is evicted
                max_backups: 10_000,
                max_bytes: 2048,
            })
            .console(false)
            .monitor_interval(Duration::from_millis(2))
            .open()
            .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..WRITES_PER_THREAD {
                    logger.infoln(&[&"thread", &t, &"write", &i]);
                    if i % 50 == 0 {
                        logger.check_rotation();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close();

    let files = all_files(&logger);
    assert!(files.len() > 1, "expected at least one rotation");
    assert_eq!(count_lines(&files), THREADS * WRITES_PER_THREAD);

    // No line was split by a rotation
    for file in &files {
        for line in std::fs::read_to_string(file).unwrap().lines() {
            assert!(line.contains(" [INFO] "), "torn line: {line}");
            assert!(line.contains(": thread "), "torn line: {line}");
        }
    }
}

#[test]
fn test_no_lines_lost_across_day_change() {
    let dir = temp_dir();
    let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    let logger = Arc::new(
        Logger::builder(dir.path(), "days.log")
            .rotation(RotationMode::Daily)
            .clock(clock.clone())
            .console(false)
            .open()
            .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..WRITES_PER_THREAD {
                    logger.warningln(&[&t, &i]);
                }
            })
        })
        .collect();

    for _ in 0..3 {
        thread::sleep(Duration::from_millis(5));
        clock.advance_days(1);
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        count_lines(&all_files(&logger)),
        THREADS * WRITES_PER_THREAD
    );
}

#[test]
fn test_level_changes_race_with_writes() {
    let dir = temp_dir();
    let logger = Arc::new(
        Logger::builder(dir.path(), "levels.log")
            .console(false)
            .open()
            .unwrap(),
    );

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..1000 {
                logger.error(i);
            }
        })
    };
    for _ in 0..100 {
        logger.set_level(Level::Fatal);
        logger.set_level(Level::Debug);
        logger.set_console(false);
    }
    writer.join().unwrap();
    logger.set_level(Level::Debug);

    let written = count_lines(&[logger.active_path().to_path_buf()]);
    assert!(written <= 1000);
    for line in std::fs::read_to_string(logger.active_path()).unwrap().lines() {
        assert!(line.contains(" [ERROR] "));
    }
}
