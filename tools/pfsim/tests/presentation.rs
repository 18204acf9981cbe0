use pfsim::{SimConfig, SimPlatform};
use picoframe::{Color, Console, Screen};

#[test]
fn flip_presents_the_drawn_buffer_and_alternates() {
    let sim = SimPlatform::install(SimConfig::immediate());
    assert_eq!(sim.frames_presented(), 0);
    assert_eq!(sim.presented().frame, 0);

    let mut screen = Screen::new(24, 16);
    let first = screen.target_buffer().data();

    let mut canvas = screen.canvas();
    canvas.blend_copy();
    canvas.pen((10, 20, 30));
    canvas.clear();
    canvas.pen(Color::WHITE);
    canvas.frect(2, 2, 4, 4);
    screen.wait_vsync();
    screen.flip();

    let shown = sim.presented();
    assert_eq!((shown.width, shown.height, shown.frame), (24, 16, 1));
    assert_eq!(shown.get(0, 0), Some(Color::rgb(10, 20, 30)));
    assert_eq!(shown.get(3, 3), Some(Color::WHITE));
    assert_eq!(shown.get(6, 6), Some(Color::rgb(10, 20, 30)));

    let second = screen.target_buffer().data();
    assert_ne!(first, second);
    assert_eq!(screen.front_buffer().data(), first);

    // the new target was never drawn to
    assert_eq!(screen.target_buffer().get(0, 0), Some(Color::BLACK));

    screen.canvas().pen((1, 1, 1));
    screen.canvas().clear();
    screen.wait_vsync();
    screen.flip();
    assert_eq!(screen.target_buffer().data(), first);
    assert_eq!(sim.presented().get(3, 3), Some(Color::rgb(1, 1, 1)));
    assert_eq!(sim.frames_presented(), 2);
    assert_eq!(sim.vsync_count(), 2);

    let mut console = Console::init(8, 8);
    let mut fill = Fill;
    console.run(&mut fill, Some(5));
    assert_eq!(sim.frames_presented(), 7);
    assert_eq!(sim.presented().get(7, 7), Some(Color::rgb(0, 0, 4)));
}

struct Fill;

impl picoframe::App for Fill {
    fn draw(&mut self, tick: u32, canvas: &mut picoframe::Canvas<'_>) {
        canvas.blend_copy();
        canvas.pen((0, 0, tick as u8));
        canvas.clear();
    }
}
