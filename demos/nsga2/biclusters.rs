use emoa::{encoding::selected, prelude::*};
use rand::prelude::*;
use rand_distr::{Normal, Uniform};

const ROWS: usize = 40;
const COLUMNS: usize = 12;

// expression-like matrix: noise with two planted biclusters
fn matrix(rng: &mut impl Rng) -> Vec<Vec<f64>> {
  let noise = Normal::new(0.0, 3.0).unwrap();
  let offsets = Uniform::new(-5.0, 5.0);
  let row_offsets: Vec<f64> = (0..ROWS).map(|_| offsets.sample(rng)).collect();
  let mut m: Vec<Vec<f64>> = (0..ROWS)
    .map(|_| (0..COLUMNS).map(|_| noise.sample(rng)).collect())
    .collect();
  // additive pattern in rows 0..10 and columns 0..4
  for r in 0..10 {
    for c in 0..4 {
      m[r][c] = row_offsets[r] + c as f64;
    }
  }
  // constant pattern in rows 20..32 and columns 6..12
  for row in m.iter_mut().take(32).skip(20) {
    for value in row.iter_mut().skip(6) {
      *value = 7.0;
    }
  }
  m
}

struct Biclustering {
  matrix: Vec<Vec<f64>>,
}

impl Biclustering {
  fn mean_squared_residue(&self, rows: &[usize], columns: &[usize]) -> f64 {
    let at = |r: usize, c: usize| self.matrix[r][c];
    let row_means: Vec<f64> = rows
      .iter()
      .map(|&r| columns.iter().map(|&c| at(r, c)).sum::<f64>())
      .map(|s| s / columns.len() as f64)
      .collect();
    let column_means: Vec<f64> = columns
      .iter()
      .map(|&c| rows.iter().map(|&r| at(r, c)).sum::<f64>())
      .map(|s| s / rows.len() as f64)
      .collect();
    let overall = row_means.iter().sum::<f64>() / rows.len() as f64;
    let mut residue = 0.0;
    for (&r, rm) in rows.iter().zip(&row_means) {
      for (&c, cm) in columns.iter().zip(&column_means) {
        residue += (at(r, c) - rm - cm + overall).powi(2);
      }
    }
    residue / (rows.len() * columns.len()) as f64
  }
}

impl Problem<Vec<Gene>> for Biclustering {
  fn number_of_variables(&self) -> usize {
    2
  }

  fn number_of_objectives(&self) -> usize {
    2
  }

  fn number_of_constraints(&self) -> usize {
    1
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<Vec<Gene>> {
    // a random subset of roughly a third of each universe
    let mut list = |universe: usize| {
      let mut genes: Vec<Gene> = (0..universe)
        .map(|i| {
          if rng.gen_bool(0.3) {
            Gene::Selected(i)
          } else {
            Gene::Unselected
          }
        })
        .collect();
      genes.sort();
      genes
    };
    let variables = vec![list(ROWS), list(COLUMNS)];
    Solution::new(variables, 2, 1)
  }

  fn evaluate(
    &self,
    solution: &mut Solution<Vec<Gene>>,
  ) -> Result<(), BoxError> {
    let rows: Vec<usize> = selected(&solution.variables()[0]).collect();
    let columns: Vec<usize> = selected(&solution.variables()[1]).collect();
    // at least two rows and two columns
    let violation = 2usize.saturating_sub(rows.len())
      + 2usize.saturating_sub(columns.len());
    solution.constraints_mut()[0] = violation as f64;
    if violation > 0 {
      solution.objectives_mut().copy_from_slice(&[0.0, 0.0]);
      return Ok(());
    }
    let msr = self.mean_squared_residue(&rows, &columns);
    let size = 0.5 * rows.len() as f64 / ROWS as f64
      + 0.5 * columns.len() as f64 / COLUMNS as f64;
    solution.objectives_mut().copy_from_slice(&[msr, -size]);
    Ok(())
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let mut rng = StdRng::seed_from_u64(7);
  let problem = Biclustering {
    matrix: matrix(&mut rng),
  };

  let universes = vec![ROWS, COLUMNS];
  let outcome = Nsga2::builder()
    .problem(problem)
    .population_size(100)
    .evaluator(ParallelEvaluator::new(0)?)
    .selection(BinaryTournament)
    .crossover(IndexListCrossover::new(0.9, 0.5, universes.clone())?)
    .mutation(IndexListMutation::new(0.05, universes)?)
    .termination(MaxGenerations(200))
    .seed(7)
    .build()
    .optimize()?;

  let mut biclusters = outcome.solutions;
  biclusters.sort_by(|a, b| a.objectives()[0].total_cmp(&b.objectives()[0]));

  println!("  MSR   | size  | rows x columns");
  for s in biclusters.iter().take(15) {
    let rows: Vec<usize> = selected(&s.variables()[0]).collect();
    let columns: Vec<usize> = selected(&s.variables()[1]).collect();
    println!(
      "{:>7.3} | {:.3} | {rows:?} x {columns:?}",
      s.objectives()[0],
      -s.objectives()[1],
    );
  }
  if biclusters.len() > 15 {
    println!("   ...  |  ...  | {} more", biclusters.len() - 15);
  }
  Ok(())
}
