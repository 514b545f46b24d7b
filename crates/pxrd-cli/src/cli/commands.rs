use super::artifacts::{format_two_column_data, read_two_column_data, write_text_artifact};
use anyhow::Context;
use pxrd_core::{
    CenteringRules, DEFAULT_GAUSSIAN_WIDTH, DEFAULT_MAX_ITERATIONS, DEFAULT_RWP_TOLERANCE,
    DEFAULT_THETA2_DIGITS, DEFAULT_WAVELENGTH, LatticeAbc, PeakProfile, PowderPeaksRequest,
    XrdCalculator, XraySpectrum, XraySpectrumData,
};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct PeaksArgs {
    /// Cell lengths a, b, c in angstrom
    #[arg(long, num_args = 3, value_names = ["A", "B", "C"])]
    cell: Vec<f64>,
    /// Cell angles alpha, beta, gamma in degrees
    #[arg(long, num_args = 3, value_names = ["ALPHA", "BETA", "GAMMA"], default_values_t = [90.0, 90.0, 90.0])]
    angles: Vec<f64>,
    /// International space-group number applying the centering extinctions
    #[arg(long)]
    spacegroup: Option<u16>,
    /// Space-group setting (2 selects rhombohedral axes for R groups)
    #[arg(long, default_value_t = 1)]
    setting: u16,
    /// X-ray wavelength in angstrom
    #[arg(long, default_value_t = DEFAULT_WAVELENGTH)]
    wavelength: f64,
    /// Digits kept when merging degenerate scattering angles
    #[arg(long, default_value_t = DEFAULT_THETA2_DIGITS)]
    digits: u32,
    /// Write the peak set as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SimulateArgs {
    /// Peak-set JSON produced by the peaks command
    #[arg(long)]
    peaks: PathBuf,
    /// First angle of the evaluation axis in degrees
    #[arg(long, default_value_t = 10.0)]
    start: f64,
    /// Last angle of the evaluation axis in degrees
    #[arg(long, default_value_t = 90.0)]
    stop: f64,
    /// Axis step in degrees
    #[arg(long, default_value_t = 0.02)]
    step: f64,
    /// Gaussian peak width in degrees
    #[arg(long, default_value_t = DEFAULT_GAUSSIAN_WIDTH)]
    width: f64,
    /// Constant baseline added to the aggregate spectrum
    #[arg(long, default_value_t = 0.0)]
    baseline: f64,
    /// Output path for the two-column spectrum
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct RefineArgs {
    /// Peak-set JSON produced by the peaks command
    #[arg(long)]
    peaks: PathBuf,
    /// Two-column experimental spectrum (angle, intensity)
    #[arg(long)]
    data: PathBuf,
    /// Gaussian peak width in degrees
    #[arg(long, default_value_t = DEFAULT_GAUSSIAN_WIDTH)]
    width: f64,
    /// Constant baseline subtracted implicitly by the forward model
    #[arg(long, default_value_t = 0.0)]
    baseline: f64,
    /// Relative Rwp change below which the refinement stops
    #[arg(long, default_value_t = DEFAULT_RWP_TOLERANCE)]
    tolerance: f64,
    /// Iteration cap; hitting it reports an exhausted refinement, not an error
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Write the refined peak set as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the final simulated spectrum as a two-column file
    #[arg(long)]
    spectrum: Option<PathBuf>,
}

pub(super) fn run_peaks_command(args: PeaksArgs) -> anyhow::Result<()> {
    let lengths: [f64; 3] = args
        .cell
        .as_slice()
        .try_into()
        .context("--cell takes exactly three lengths")?;
    let degrees: [f64; 3] = args
        .angles
        .as_slice()
        .try_into()
        .context("--angles takes exactly three angles")?;
    let angles = degrees.map(f64::to_radians);

    let lattice = LatticeAbc::new(lengths, angles)?;
    let mut request = PowderPeaksRequest::from_lattice(lattice);
    if let Some(number) = args.spacegroup {
        request = request.with_spacegroup(number, args.setting);
    }

    let mut calculator = XrdCalculator::new(args.wavelength);
    calculator.theta2_digits = args.digits;
    let peaks = calculator.powder_peaks(&request, &CenteringRules)?;

    println!("# {} peaks, {} reflections", peaks.peak_count(), peaks.reflection_count());
    println!("#   2theta/deg        1/d     mult  representative");
    for index in 0..peaks.peak_count() {
        println!(
            "{:>12.6} {:>10.6} {:>8} {:>15}",
            peaks.theta2[index],
            peaks.inv_d[index],
            peaks.hkl_groups[index].len(),
            peaks.hkl_unique[index],
        );
    }

    if let Some(path) = &args.output {
        write_peak_set(path, &peaks)?;
    }
    Ok(())
}

pub(super) fn run_simulate_command(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step > 0.0, "--step must be positive");
    anyhow::ensure!(args.stop > args.start, "--stop must be above --start");

    let mut peaks = read_peak_set(&args.peaks)?;
    if peaks.intensity.iter().all(|&value| value == 0.0) {
        tracing::warn!("peak set carries no intensities, using unit intensities");
        peaks.intensity = vec![1.0; peaks.peak_count()];
    }

    let steps = ((args.stop - args.start) / args.step).floor() as usize + 1;
    let axis: Vec<f64> = (0..steps)
        .map(|index| args.start + index as f64 * args.step)
        .collect();

    let profile = PeakProfile::gaussian(Some(&[args.width]));
    let mut calculator = XrdCalculator::new(peaks.wavelength).with_profile(profile);
    calculator.baseline = args.baseline;
    let (spectrum, _) = calculator.simulate(&peaks, &axis)?;

    let body = format_two_column_data(spectrum.theta2(), spectrum.intensity());
    write_text_artifact(&args.output, &body)?;
    println!("wrote {} points to {}", spectrum.len(), args.output.display());
    Ok(())
}

pub(super) fn run_refine_command(args: RefineArgs) -> anyhow::Result<()> {
    let peaks = read_peak_set(&args.peaks)?;
    let (axis, intensity) = read_two_column_data(&args.data)?;
    let experimental = XraySpectrumData::new(axis, intensity)?;

    let profile = PeakProfile::gaussian(Some(&[args.width]));
    let mut calculator = XrdCalculator::new(peaks.wavelength).with_profile(profile);
    calculator.baseline = args.baseline;
    let refinement = calculator.refine(&peaks, &experimental, args.tolerance, args.max_iterations)?;

    println!(
        "{:?} after {} iterations, Rwp = {:.6e}",
        refinement.status, refinement.iterations, refinement.rwp
    );
    if let Some(path) = &args.output {
        write_peak_set(path, &refinement.peaks)?;
    }
    if let Some(path) = &args.spectrum {
        let body = format_two_column_data(
            refinement.spectrum.theta2(),
            refinement.spectrum.intensity(),
        );
        write_text_artifact(path, &body)?;
    }
    Ok(())
}

fn read_peak_set(path: &std::path::Path) -> anyhow::Result<XraySpectrum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing peak set {}", path.display()))
}

fn write_peak_set(path: &std::path::Path, peaks: &XraySpectrum) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(peaks).context("serializing peak set")?;
    write_text_artifact(path, &json)
}
