use std::sync::mpsc;

use emoa::{prelude::*, quality::igd_plus, ranking::non_dominated};
use rand::{Rng, RngCore};

/// Schaffer's problem N.1, optimal for `x` in `[0, 2]`.
struct Schaffer;

impl Problem<f64> for Schaffer {
  fn number_of_variables(&self) -> usize {
    1
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    Solution::new(vec![rng.gen_range(-10.0..10.0)], 2, 0)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let x = solution.variables()[0];
    solution
      .objectives_mut()
      .copy_from_slice(&[x.powi(2), (x - 2.0).powi(2)]);
    Ok(())
  }
}

/// ZDT1 with `n` variables in `[0, 1]`. The Pareto front is
/// `f2 = 1 - sqrt(f1)`.
struct Zdt1(usize);

impl Problem<f64> for Zdt1 {
  fn number_of_variables(&self) -> usize {
    self.0
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    Solution::new((0..self.0).map(|_| rng.gen()).collect(), 2, 0)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let x = solution.variables();
    let f1 = x[0];
    let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (self.0 - 1) as f64;
    let f2 = g * (1.0 - (f1 / g).sqrt());
    solution.objectives_mut().copy_from_slice(&[f1, f2]);
    Ok(())
  }
}

/// Deb's CONSTR problem: two objectives, two inequality constraints.
struct Constr;

impl Problem<f64> for Constr {
  fn number_of_variables(&self) -> usize {
    2
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn number_of_constraints(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    let x = vec![rng.gen_range(0.1..=1.0), rng.gen_range(0.0..=5.0)];
    Solution::new(x, 2, 2)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let (x1, x2) = (solution.variables()[0], solution.variables()[1]);
    solution
      .objectives_mut()
      .copy_from_slice(&[x1, (1.0 + x2) / x1]);
    let violations = [
      (6.0 - (x2 + 9.0 * x1)).max(0.0),
      (1.0 - (9.0 * x1 - x2)).max(0.0),
    ];
    solution.constraints_mut().copy_from_slice(&violations);
    Ok(())
  }
}

/// Fails to evaluate anything beyond `x = 9`.
struct Fragile;

impl Problem<f64> for Fragile {
  fn number_of_variables(&self) -> usize {
    1
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    Schaffer.create_solution(rng)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let x = solution.variables()[0];
    if x > 9.0 {
      return Err(format!("{x} is out of the model's range").into());
    }
    Schaffer.evaluate(solution)
  }
}

/// CONSTR whose model fails for `x2 > 4`.
struct FragileConstr;

impl Problem<f64> for FragileConstr {
  fn number_of_variables(&self) -> usize {
    2
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn number_of_constraints(&self) -> usize {
    2
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
    Constr.create_solution(rng)
  }

  fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
    let x2 = solution.variables()[1];
    if x2 > 4.0 {
      return Err(format!("x2 = {x2} is out of the model's range").into());
    }
    Constr.evaluate(solution)
  }
}

fn bounds(n: usize, lower: f64, upper: f64) -> Vec<Bounds<f64>> {
  vec![Bounds { lower, upper }; n]
}

#[test]
fn test_parallel_schaffer() {
  let b = bounds(1, -10.0, 10.0);
  let outcome = Nsga2::builder()
    .problem(Schaffer)
    .population_size(50)
    .evaluator(ParallelEvaluator::new(4).unwrap())
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
    .termination(MaxEvaluations(5_000))
    .seed(1)
    .build()
    .optimize()
    .unwrap();
  assert_eq!(outcome.stop, StopReason::Terminated);
  assert!(outcome.solutions.len() > 10);
  assert!(outcome
    .solutions
    .iter()
    .all(|s| (-0.1..=2.1).contains(&s.variables()[0])));
}

#[test]
fn test_zdt1_approaches_pareto_front() {
  let n = 30;
  let b = bounds(n, 0.0, 1.0);
  let outcome = Nsga2::builder()
    .problem(Zdt1(n))
    .population_size(100)
    .evaluator(ParallelEvaluator::new(0).unwrap().batched())
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(1.0 / n as f64, 20.0, b).unwrap())
    .termination(MaxEvaluations(20_000))
    .seed(2024)
    .build()
    .optimize()
    .unwrap();

  let reference: Vec<[f64; 2]> = (0..=100u32)
    .map(|i| {
      let f1 = f64::from(i) / 100.0;
      [f1, 1.0 - f1.sqrt()]
    })
    .collect();
  let front: Vec<&[f64]> =
    outcome.solutions.iter().map(|s| s.objectives()).collect();
  let igd = igd_plus(&front, &reference).unwrap();
  assert!(igd < 0.05, "IGD+ of {igd} is too high");
}

#[test]
fn test_constrained_problem_ends_feasible() {
  let b = vec![
    Bounds::new(0.1, 1.0).unwrap(),
    Bounds::new(0.0, 5.0).unwrap(),
  ];
  let outcome = Nsga2::builder()
    .problem(Constr)
    .population_size(60)
    .evaluator(SequentialEvaluator::new())
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(0.5, 20.0, b).unwrap())
    .termination(MaxGenerations(60))
    .seed(9)
    .build()
    .optimize()
    .unwrap();
  assert!(!outcome.solutions.is_empty());
  assert!(outcome.solutions.iter().all(Solution::is_feasible));
  // the result is mutually non-dominated
  assert_eq!(
    non_dominated(&outcome.solutions).unwrap().len(),
    outcome.solutions.len()
  );
}

#[test]
fn test_evaluation_failure_aborts_run() {
  let b = bounds(1, -10.0, 10.0);
  let result = Nsga2::builder()
    .problem(Fragile)
    .population_size(200)
    .evaluator(ParallelEvaluator::new(2).unwrap())
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
    .termination(MaxGenerations(10))
    .seed(5)
    .build()
    .optimize();
  let Err(Error::Evaluation { generation, .. }) = result else {
    panic!("evaluation failure must abort the run");
  };
  // among 200 random points in [-10, 10] some lie beyond 9
  assert_eq!(generation, 0);
}

#[test]
fn test_evaluation_failure_penalized() {
  let b = bounds(1, -10.0, 10.0);
  let outcome = Nsga2::builder()
    .problem(Fragile)
    .population_size(200)
    .evaluator(
      ParallelEvaluator::new(2)
        .unwrap()
        .with_policy(FailurePolicy::Penalize),
    )
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
    .termination(MaxGenerations(10))
    .seed(5)
    .build()
    .optimize()
    .unwrap();
  assert_eq!(outcome.generations, 10);
  assert!(outcome
    .solutions
    .iter()
    .all(|s| s.objectives().iter().all(|&o| o < f64::MAX)));
}

#[test]
fn test_penalized_failures_never_reach_constrained_result() {
  let b = vec![
    Bounds::new(0.1, 1.0).unwrap(),
    Bounds::new(0.0, 5.0).unwrap(),
  ];
  let outcome = Nsga2::builder()
    .problem(FragileConstr)
    .population_size(60)
    .evaluator(SequentialEvaluator::new().with_policy(FailurePolicy::Penalize))
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(0.5, 20.0, b).unwrap())
    .termination(MaxGenerations(30))
    .seed(13)
    .build()
    .optimize()
    .unwrap();
  assert!(!outcome.solutions.is_empty());
  for s in &outcome.solutions {
    assert!(s.is_feasible());
    assert!(s.objectives().iter().all(|&o| o < f64::MAX));
    assert!(s.variables()[1] <= 4.0);
  }
}

#[test]
fn test_seeded_runs_are_reproducible() {
  let run = || {
    let b = bounds(5, 0.0, 1.0);
    Nsga2::builder()
      .problem(Zdt1(5))
      .population_size(20)
      .evaluator(ParallelEvaluator::new(3).unwrap())
      .selection(BinaryTournament)
      .crossover(SbxCrossover::new(0.9, 15.0, b.clone()).unwrap())
      .mutation(PolynomialMutation::new(0.2, 20.0, b).unwrap())
      .termination(MaxGenerations(15))
      .seed(77)
      .build()
      .optimize()
      .unwrap()
  };
  let (a, b) = (run(), run());
  assert_eq!(a.evaluations, b.evaluations);
  assert_eq!(a.solutions, b.solutions);
}

#[test]
fn test_cancellation_from_observer() {
  let token = CancellationToken::new();
  let trigger = token.clone();
  let observer: Box<dyn Observer<f64> + Send> =
    Box::new(move |p: &Progress<f64>| {
      if p.generation == 3 {
        trigger.cancel();
      }
    });
  let b = bounds(1, -10.0, 10.0);
  let outcome = Nsga2::builder()
    .problem(Schaffer)
    .population_size(10)
    .evaluator(SequentialEvaluator::new())
    .selection(RandomSelection)
    .crossover(SinglePointCrossover::new(0.9).unwrap())
    .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
    .termination(MaxGenerations(1_000))
    .observers(vec![observer])
    .cancellation(token)
    .build()
    .optimize()
    .unwrap();
  assert_eq!(outcome.stop, StopReason::Cancelled);
  assert_eq!(outcome.generations, 3);
  assert_eq!(outcome.evaluations, 40);
}

#[test]
fn test_channel_observer_reports_each_generation() {
  let (tx, rx) = mpsc::sync_channel(64);
  let b = bounds(1, -10.0, 10.0);
  Nsga2::builder()
    .problem(Schaffer)
    .population_size(10)
    .evaluator(SequentialEvaluator::new())
    .selection(BinaryTournament)
    .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
    .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
    .termination(MaxGenerations(5))
    .observers(vec![Box::new(ChannelObserver::new(tx))])
    .build()
    .optimize()
    .unwrap();
  let reports: Vec<ProgressReport> = rx.try_iter().collect();
  let generations: Vec<usize> = reports.iter().map(|r| r.generation).collect();
  assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
  assert!(reports.iter().all(|r| !r.front.is_empty()));
  assert_eq!(reports[5].evaluations, 60);
}

#[test]
fn test_shared_archive_collects_across_runs() {
  let archive = SharedArchive::new(30).unwrap();
  for seed in 0..3 {
    let b = bounds(1, -10.0, 10.0);
    Nsga2::builder()
      .problem(Schaffer)
      .population_size(20)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(SbxCrossover::new(0.9, 20.0, b.clone()).unwrap())
      .mutation(PolynomialMutation::new(1.0, 20.0, b).unwrap())
      .termination(MaxGenerations(10))
      .archive(archive.clone())
      .seed(seed)
      .build()
      .optimize()
      .unwrap();
  }
  let solutions = archive.solutions();
  assert_eq!(solutions.len(), 30);
  assert_eq!(non_dominated(&solutions).unwrap().len(), 30);
}
