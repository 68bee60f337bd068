use static_cell::StaticCell;

use crate::buzzer_common::{
    BoardContext, BoardTrait, BuzzerError, BuzzerResult, Errno, FileOperations, MiscRegistry,
    PwmProvider, error, info, warn,
};
use crate::console::{self, Request};
use crate::driver::{MODULE_INFO, PwmBuzzerDriver};
use crate::module::BuzzerModule;

type BoardPwm<B> = <<B as BoardTrait>::PwmProvider as PwmProvider>::Pwm;

/// 用板级配置建立模块状态，绑定板级设备并逐行处理控制台请求，
/// 输入结束或收到 quit 后执行 remove
pub fn main_task<B, I>(
    module_cell: &'static StaticCell<BuzzerModule<BoardPwm<B>>>,
    ctx: BoardContext<B>,
    requests: I,
) -> BuzzerResult<()>
where
    B: BoardTrait,
    BoardPwm<B>: Send + 'static,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    info!(
        "{} {} ({}) starting",
        MODULE_INFO.name, MODULE_INFO.description, MODULE_INFO.alias
    );

    let BoardContext {
        pwm,
        misc,
        device,
        config,
    } = ctx;
    let Some(module) = module_cell.try_init(BuzzerModule::new(config)) else {
        error!("{} module state already initialized", MODULE_INFO.name);
        return Err(BuzzerError::RegistrationFailure(Errno::EBUSY));
    };
    let module: &'static BuzzerModule<BoardPwm<B>> = module;
    let mut driver = PwmBuzzerDriver::new(module, pwm, misc);
    if !driver.matches(&device) {
        warn!("{} does not match {}", device.name(), MODULE_INFO.name);
        return Err(BuzzerError::NotMatched);
    }
    driver.probe(&device)?;

    for line in requests {
        let request = match console::parse(line.as_ref()) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        if request == Request::Quit {
            break;
        }
        serve(&driver, request);
    }

    driver.remove()
}

fn serve<H, R>(driver: &PwmBuzzerDriver<H, R>, request: Request)
where
    H: PwmProvider,
    H::Pwm: Send + 'static,
    R: MiscRegistry,
{
    match request {
        Request::Suspend => {
            if let Err(e) = driver.suspend() {
                error!("suspend failed: {}", e);
            }
        }
        Request::Resume => {
            if let Err(e) = driver.resume() {
                error!("resume failed: {}", e);
            }
        }
        _ => {
            let node = &driver.module().config().node_name;
            let Some(fops) = driver.registry().find(node) else {
                warn!("/dev/{} is not registered", node);
                return;
            };
            file_request(fops, request);
        }
    }
}

fn file_request(fops: &dyn FileOperations, request: Request) {
    match request {
        Request::Open => {
            if let Err(errno) = fops.open() {
                warn!("open failed: {}", errno);
            }
        }
        Request::Release => {
            if let Err(errno) = fops.release() {
                warn!("release failed: {}", errno);
            }
        }
        Request::Ioctl { cmd, arg } => {
            let status = fops.unlocked_ioctl(cmd, arg);
            info!("ioctl({}, {}) = {}", cmd, arg, status);
        }
        Request::Suspend | Request::Resume | Request::Quit => {}
    }
}
