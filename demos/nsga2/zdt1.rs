use std::{io::Write, path::Path, sync::mpsc, thread};

use emoa::{prelude::*, quality::igd_plus};
use rand::prelude::*;

// ZDT1 with 30 decision variables in [0, 1]
const N: usize = 30;

struct Zdt1;

impl Problem<f64> for Zdt1 {
  fn number_of_variables(&self) -> usize {
    N
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    Solution::new((0..N).map(|_| rng.gen()).collect(), 2, 0)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let x = solution.variables();
    let f1 = x[0];
    let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (N - 1) as f64;
    let f2 = g * (1.0 - (f1 / g).sqrt());
    solution.objectives_mut().copy_from_slice(&[f1, f2]);
    Ok(())
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  // try `RUST_LOG=debug cargo run --example nsga2_zdt1`
  env_logger::init();

  let bounds = vec![Bounds::new(0.0, 1.0).ok_or("empty bounds")?; N];

  // progress is reported from another thread; when the receiver lags behind,
  // reports are dropped instead of blocking the optimizer
  let (tx, rx) = mpsc::sync_channel::<ProgressReport>(8);
  let printer = thread::spawn(move || {
    for report in rx {
      if report.generation % 25 == 0 {
        println!(
          "generation {:>3} | {:>5} evaluations | {:>3} on the front | {:?}",
          report.generation,
          report.evaluations,
          report.front.len(),
          report.elapsed,
        );
      }
    }
  });

  let outcome = Nsga2::builder()
    .problem(Zdt1)
    .population_size(100)
    .evaluator(ParallelEvaluator::new(0)?)
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, bounds.clone())?)
    .mutation(PolynomialMutation::new(1.0 / N as f64, 20.0, bounds)?)
    .termination(MaxEvaluations(25_000))
    .observers(vec![Box::new(ChannelObserver::new(tx))])
    .archive(SharedArchive::new(100)?)
    .seed(42)
    .build()
    .optimize()?;
  // the sender is dropped together with the optimizer
  let _ = printer.join();

  let reference: Vec<[f64; 2]> = (0..=500u32)
    .map(|i| {
      let f1 = f64::from(i) / 500.0;
      [f1, 1.0 - f1.sqrt()]
    })
    .collect();
  let front: Vec<&[f64]> =
    outcome.solutions.iter().map(|s| s.objectives()).collect();
  println!(
    "{} solutions after {} generations, IGD+ = {:.5}",
    outcome.solutions.len(),
    outcome.generations,
    igd_plus(&front, &reference)?,
  );

  // write objectives to demos/nsga2/zdt1.csv
  std::fs::File::create(Path::new(file!()).with_file_name("zdt1.csv"))?
    .write_all(
      front
        .iter()
        .map(|o| format!("{} {}", o[0], o[1]))
        .collect::<Vec<_>>()
        .join("\n")
        .as_bytes(),
    )?;

  // and print 10 of them
  println!("   f1   |   f2   ");
  for o in front.choose_multiple(&mut rand::thread_rng(), 10) {
    println!("{:.4} | {:.4}", o[0], o[1]);
  }
  println!("  ...   |  ...   ");
  Ok(())
}
