use super::base_prior::PriorDistribution;
use crate::config::ImagePriorConfig;
use crate::error::{FlowError, Result};
use crate::misc::shape::{check_num_samples, check_trailing_dims};
use log::{debug, warn};
use ndarray::{s, Array2};
use tch::{Device, Kind, Tensor};

/// Empirical density given by the pixel intensities of an image placed on
/// the box `x_range × y_range`.
///
/// The density is piecewise constant: a point is mapped into the unit box,
/// clamped to `[0, 1]` and floored onto a grid cell, without interpolation.
/// Sampling is rejection sampling against the max-scaled intensity and is
/// bounded by `max_rounds` rounds.
#[derive(Debug)]
pub struct ImagePrior {
    /// Intensity scaled to `(0, 1]`, indexed `[x, y]`.
    image: Tensor,
    /// log(intensity / Σ intensity), same layout as `image`.
    density: Tensor,
    grid: [i64; 2],
    scale: Tensor,
    shift: Tensor,
    max_rounds: usize,
}

impl ImagePrior {
    /// `image` is indexed `[row, column]` with row 0 at the top, as it
    /// comes from an image decoder.
    pub fn from_array(
        image: &Array2<f64>,
        config: &ImagePriorConfig,
        device: Device,
    ) -> Result<Self> {
        config.validate()?;
        if image.is_empty() {
            return Err(FlowError::Precondition(
                "image must contain at least one pixel".into(),
            ));
        }
        if image.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(FlowError::Precondition(
                "image intensities must be finite and non-negative".into(),
            ));
        }

        // bottom row first, then [x, y] indexing
        let grid = image.slice(s![..;-1, ..]).t().mapv(|v| v + config.eps);
        let max = grid.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        if !(max > 0.0) {
            return Err(FlowError::Precondition(
                "image has no positive intensity, rejection sampling could never accept".into(),
            ));
        }
        let intensity = grid.mapv(|v| v / max);
        let total = intensity.sum();
        let (width, height) = intensity.dim();
        let grid = [width as i64, height as i64];

        let values: Vec<f64> = intensity.iter().cloned().collect();
        let log_density: Vec<f64> = values.iter().map(|v| (v / total).ln()).collect();
        let image = Tensor::from_slice(&values)
            .view(grid)
            .to_kind(Kind::Float)
            .to_device(device);
        let density = Tensor::from_slice(&log_density)
            .view(grid)
            .to_kind(Kind::Float)
            .to_device(device);

        let [x0, x1] = config.x_range;
        let [y0, y1] = config.y_range;
        let scale = Tensor::from_slice(&[x1 - x0, y1 - y0])
            .view([1, 2])
            .to_kind(Kind::Float)
            .to_device(device);
        let shift = Tensor::from_slice(&[x0, y0])
            .view([1, 2])
            .to_kind(Kind::Float)
            .to_device(device);

        debug!(
            "image prior on {}x{} grid, mean intensity {:.4}",
            width,
            height,
            total / values.len() as f64
        );

        Ok(ImagePrior {
            image,
            density,
            grid,
            scale,
            shift,
            max_rounds: config.max_rounds,
        })
    }

    pub fn grid_size(&self) -> [i64; 2] {
        self.grid
    }

    /// Grid cell `[x, y]` of every point, `(..., 2)` as `Int64`.
    pub fn cell_index(&self, z: &Tensor) -> Result<Tensor> {
        check_trailing_dims(z, &[2])?;
        // NaN survives the clamp and would cast to an out-of-range index
        if z.isfinite().logical_not().any().int64_value(&[]) != 0 {
            return Err(FlowError::Numerical(
                "image prior cannot place non-finite points on its grid".into(),
            ));
        }
        let unit = ((z - &self.shift) / &self.scale).clamp(0.0, 1.0);
        Ok(self.unit_to_cell(&unit))
    }

    fn unit_to_cell(&self, unit: &Tensor) -> Tensor {
        let last = Tensor::from_slice(&[self.grid[0] - 1, self.grid[1] - 1])
            .to_kind(Kind::Float)
            .to_device(unit.device());
        (unit * last).to_kind(Kind::Int64)
    }

    /// Values of `table` at the cells in `cells`, shaped like `cells`
    /// without its last axis.
    fn lookup(&self, table: &Tensor, cells: &Tensor) -> Tensor {
        let flat = cells.select(-1, 0) * Tensor::from(self.grid[1]) + cells.select(-1, 1);
        let lead = flat.size();
        table
            .view([-1])
            .index_select(0, &flat.reshape([-1]))
            .reshape(lead.as_slice())
    }

    /// One round of `num_steps` proposals; returns only the accepted points.
    pub fn rejection_sampling(&self, num_steps: i64) -> Result<Tensor> {
        check_num_samples(num_steps)?;
        let device = self.image.device();
        let unit = Tensor::rand(&[num_steps, 2], (Kind::Float, device));
        let prob = Tensor::rand(&[num_steps], (Kind::Float, device));
        let intensity = self.lookup(&self.image, &self.unit_to_cell(&unit));
        let accept = intensity.gt_tensor(&prob).nonzero().view([-1]);
        Ok(unit.index_select(0, &accept) * &self.scale + &self.shift)
    }

    /// Exactly `num_samples` points, or an error if `max_rounds` rounds of
    /// `num_samples` proposals each do not accept enough of them.
    pub fn sample(&self, num_samples: i64) -> Result<Tensor> {
        check_num_samples(num_samples)?;
        let mut chunks: Vec<Tensor> = Vec::new();
        let mut accepted = 0;
        let mut rounds = 0;
        while accepted < num_samples {
            if rounds == self.max_rounds {
                warn!(
                    "rejection sampling stopped after {} rounds with {}/{} samples",
                    rounds, accepted, num_samples
                );
                return Err(FlowError::RejectionExhausted {
                    rounds,
                    accepted,
                    requested: num_samples,
                });
            }
            let z = self.rejection_sampling(num_samples)?;
            let take = z.size()[0].min(num_samples - accepted);
            debug!(
                "rejection round {}: accepted {} of {} proposals",
                rounds,
                z.size()[0],
                num_samples
            );
            if take > 0 {
                chunks.push(z.narrow(0, 0, take));
                accepted += take;
            }
            rounds += 1;
        }
        if chunks.is_empty() {
            return Ok(Tensor::zeros(&[0, 2], (Kind::Float, self.image.device())));
        }
        Ok(Tensor::cat(&chunks, 0))
    }
}

impl PriorDistribution for ImagePrior {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let cells = self.cell_index(z)?;
        Ok(self.lookup(&self.density, &cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_rounds: usize) -> ImagePriorConfig {
        ImagePriorConfig {
            max_rounds,
            ..Default::default()
        }
    }

    #[test]
    fn test_corner_cells() {
        let image = Array2::<f64>::ones((5, 7));
        let prior = ImagePrior::from_array(&image, &config(10), Device::Cpu).unwrap();
        // columns become x, rows become y
        assert_eq!(prior.grid_size(), [7, 5]);

        let z = Tensor::from_slice(&[-3.0f32, -3.0, 3.0, 3.0, 10.0, -10.0]).view([3, 2]);
        let cells = prior.cell_index(&z).unwrap();
        assert_eq!(cells.size(), vec![3, 2]);
        assert_eq!(cells.int64_value(&[0, 0]), 0);
        assert_eq!(cells.int64_value(&[0, 1]), 0);
        assert_eq!(cells.int64_value(&[1, 0]), 6);
        assert_eq!(cells.int64_value(&[1, 1]), 4);
        assert_eq!(cells.int64_value(&[2, 0]), 6);
        assert_eq!(cells.int64_value(&[2, 1]), 0);
    }

    #[test]
    fn test_log_prob_orientation() {
        // brightest pixel in the top-right corner of the picture
        let mut image = Array2::<f64>::ones((3, 3));
        image[[0, 2]] = 2.0;
        let prior = ImagePrior::from_array(&image, &config(10), Device::Cpu).unwrap();

        let z = Tensor::from_slice(&[3.0f32, 3.0, -3.0, -3.0]).view([2, 2]);
        let log_p = prior.log_prob(&z).unwrap();
        assert_eq!(log_p.size(), vec![2]);
        assert!((log_p.double_value(&[0]) - 0.2f64.ln()).abs() < 1e-5);
        assert!((log_p.double_value(&[1]) - 0.1f64.ln()).abs() < 1e-5);

        let point = Tensor::from_slice(&[3.0f32, 3.0]);
        assert!(prior.log_prob(&point).unwrap().size().is_empty());
    }

    #[test]
    fn test_piecewise_constant_density() {
        let image = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as f64 + 1.0);
        let prior = ImagePrior::from_array(&image, &config(10), Device::Cpu).unwrap();
        // both points floor onto cell [0, 0]
        let z = Tensor::from_slice(&[-3.0f32, -3.0, -2.1, -2.1]).view([2, 2]);
        let log_p = prior.log_prob(&z).unwrap();
        assert_eq!(log_p.double_value(&[0]), log_p.double_value(&[1]));
    }

    #[test]
    fn test_uniform_image_accepts_everything() {
        tch::manual_seed(1);
        let image = Array2::<f64>::ones((6, 6));
        let prior = ImagePrior::from_array(&image, &config(1), Device::Cpu).unwrap();
        let z = prior.sample(100).unwrap();
        assert_eq!(z.size(), vec![100, 2]);
        assert!(z.min().double_value(&[]) >= -3.0);
        assert!(z.max().double_value(&[]) <= 3.0);
    }

    #[test]
    fn test_samples_follow_bright_half() {
        tch::manual_seed(2);
        let image = Array2::from_shape_fn((9, 9), |(_, c)| if c < 4 { 1.0 } else { 0.0 });
        let prior = ImagePrior::from_array(&image, &config(1000), Device::Cpu).unwrap();
        let z = prior.sample(200).unwrap();
        assert_eq!(z.size(), vec![200, 2]);
        assert!(z.select(1, 0).max().double_value(&[]) < 0.0);
    }

    #[test]
    fn test_exhausted_rounds() {
        tch::manual_seed(3);
        let mut image = Array2::<f64>::zeros((64, 64));
        image[[63, 0]] = 1.0;
        let prior = ImagePrior::from_array(&image, &config(1), Device::Cpu).unwrap();
        match prior.sample(1000) {
            Err(FlowError::RejectionExhausted {
                rounds, requested, ..
            }) => {
                assert_eq!(rounds, 1);
                assert_eq!(requested, 1000);
            }
            other => panic!("expected exhausted rounds, got {:?}", other.map(|t| t.size())),
        }
    }

    #[test]
    fn test_sample_zero() {
        let image = Array2::<f64>::ones((2, 2));
        let prior = ImagePrior::from_array(&image, &config(1), Device::Cpu).unwrap();
        assert_eq!(prior.sample(0).unwrap().size(), vec![0, 2]);
        assert!(matches!(prior.sample(-1), Err(FlowError::Config(_))));
        assert!(matches!(
            prior.rejection_sampling(-1),
            Err(FlowError::Config(_))
        ));
    }

    #[test]
    fn test_single_round_stays_in_box() {
        tch::manual_seed(4);
        let image = Array2::<f64>::ones((4, 4));
        let prior = ImagePrior::from_array(&image, &config(1), Device::Cpu).unwrap();
        let z = prior.rejection_sampling(50).unwrap();
        assert_eq!(z.size(), vec![50, 2]);
        assert!(z.abs().max().double_value(&[]) <= 3.0);
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        let image = Array2::<f64>::ones((3, 3));
        let prior = ImagePrior::from_array(&image, &config(1), Device::Cpu).unwrap();
        for bad in [f32::NAN, f32::INFINITY] {
            let z = Tensor::from_slice(&[bad, 0.0, 1.0, 1.0]).view([2, 2]);
            assert!(matches!(
                prior.cell_index(&z),
                Err(FlowError::Numerical(_))
            ));
            assert!(matches!(prior.log_prob(&z), Err(FlowError::Numerical(_))));
        }
    }

    #[test]
    fn test_invalid_images() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            ImagePrior::from_array(&empty, &config(1), Device::Cpu),
            Err(FlowError::Precondition(_))
        ));
        let mut negative = Array2::<f64>::ones((2, 2));
        negative[[0, 0]] = -1.0;
        assert!(ImagePrior::from_array(&negative, &config(1), Device::Cpu).is_err());
        let bad_range = ImagePriorConfig {
            x_range: [1.0, -1.0],
            ..Default::default()
        };
        assert!(matches!(
            ImagePrior::from_array(&Array2::ones((2, 2)), &bad_range, Device::Cpu),
            Err(FlowError::Config(_))
        ));
    }
}
