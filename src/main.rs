use std::env;

use examples::{evaluate_prior_on_grid, fit_diag_gaussian_to_prior};
use flowprim::config::PriorConfig;
use flowprim::Result;
use log::info;

mod examples;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let mut task = String::from("grid");
    let mut config_path: Option<String> = None;
    let mut n_steps: usize = 1000;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--task" => {
                if let Some(value) = iter.next() {
                    task = value.clone();
                }
            }
            "--config" => {
                config_path = iter.next().cloned();
            }
            "--steps" => {
                if let Some(value) = iter.next() {
                    n_steps = value.parse().expect("--steps must be an integer");
                }
            }
            _ => {}
        }
    }

    let config = match &config_path {
        Some(path) => PriorConfig::from_json_file(path)?,
        None => PriorConfig::TwoModes {
            loc: 2.0,
            scale: 0.2,
        },
    };
    info!("task: {}, prior: {:?}", task, config);
    let prior = config.build()?;

    match task.as_str() {
        "grid" => {
            evaluate_prior_on_grid(prior.as_ref(), 200, 5.0)?;
        }
        "fit" => {
            fit_diag_gaussian_to_prior(prior.as_ref(), n_steps, 256, 1e-2)?;
        }
        _ => panic!("Invalid task: {}", task),
    }
    Ok(())
}
